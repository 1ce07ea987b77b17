//! Short opaque identifiers for fields and options.
//!
//! Form fields and their options are addressed by short base-36 identifiers
//! that are allocated once and never regenerated. Generation sits behind the
//! [`IdGenerator`] trait so builders and tests can run deterministically.

use std::sync::atomic::{AtomicU64, Ordering};

use rand::Rng;

/// Length of generated identifiers.
pub const GENERATED_ID_LEN: usize = 7;
/// Maximum accepted length for client-supplied identifiers.
pub const IDENTIFIER_MAX_LEN: usize = 64;

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Source of fresh identifiers.
pub trait IdGenerator: Send + Sync {
    /// Produce the next identifier.
    fn next_id(&self) -> String;
}

/// Random base-36 identifiers of [`GENERATED_ID_LEN`] characters.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIdGenerator;

impl IdGenerator for RandomIdGenerator {
    fn next_id(&self) -> String {
        random_base36(GENERATED_ID_LEN)
    }
}

/// Deterministic identifiers (`{prefix}1`, `{prefix}2`, ...).
///
/// # Examples
/// ```
/// use safety_backend::domain::ids::{IdGenerator, SequentialIdGenerator};
///
/// let ids = SequentialIdGenerator::new("f");
/// assert_eq!(ids.next_id(), "f1");
/// assert_eq!(ids.next_id(), "f2");
/// ```
#[derive(Debug)]
pub struct SequentialIdGenerator {
    prefix: String,
    counter: AtomicU64,
}

impl SequentialIdGenerator {
    /// Create a generator whose identifiers start with `prefix`.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: AtomicU64::new(0),
        }
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&self) -> String {
        let next = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{}{next}", self.prefix)
    }
}

/// Generate `len` random lowercase base-36 characters.
pub fn random_base36(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| {
            let index = rng.gen_range(0..BASE36.len());
            BASE36.get(index).copied().map_or('0', char::from)
        })
        .collect()
}

/// Validation errors for client-supplied identifiers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentifierError {
    /// The identifier was empty.
    #[error("identifier must not be empty")]
    Empty,
    /// The identifier exceeded [`IDENTIFIER_MAX_LEN`].
    #[error("identifier must be at most {max} characters")]
    TooLong {
        /// Maximum accepted length.
        max: usize,
    },
    /// The identifier used characters outside `[A-Za-z0-9_-]`.
    #[error("identifier may only contain letters, digits, '_' or '-'")]
    InvalidCharacters,
}

pub(crate) fn validate_identifier(value: &str) -> Result<(), IdentifierError> {
    if value.is_empty() {
        return Err(IdentifierError::Empty);
    }
    if value.len() > IDENTIFIER_MAX_LEN {
        return Err(IdentifierError::TooLong {
            max: IDENTIFIER_MAX_LEN,
        });
    }
    if !super::slug::has_identifier_chars(value) {
        return Err(IdentifierError::InvalidCharacters);
    }
    Ok(())
}

/// Define a validated string identifier newtype.
macro_rules! define_identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            serde::Serialize,
            serde::Deserialize,
            utoipa::ToSchema,
        )]
        #[serde(try_from = "String", into = "String")]
        #[schema(value_type = String)]
        pub struct $name(String);

        impl $name {
            /// Validate and wrap an identifier.
            pub fn new(value: impl Into<String>) -> Result<Self, $crate::domain::ids::IdentifierError> {
                let value = value.into();
                $crate::domain::ids::validate_identifier(&value)?;
                Ok(Self(value))
            }

            /// Allocate a fresh identifier from `ids`.
            ///
            /// Generators are trusted to emit identifier-safe characters.
            pub fn generate(ids: &dyn $crate::domain::ids::IdGenerator) -> Self {
                Self(ids.next_id())
            }

            /// Borrow the identifier text.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = $crate::domain::ids::IdentifierError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }
    };
}

pub(crate) use define_identifier;
