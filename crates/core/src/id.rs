// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! ID generation for jobs and blobs.

/// Length of generated identifiers.
///
/// 21 characters of the URL-safe nanoid alphabet gives collision
/// resistance comparable to a UUID while staying path-friendly.
pub const ID_LEN: usize = 21;

/// Define a newtype ID wrapper with nanoid-backed generation.
///
/// Generates `new()` for random ID generation, `as_str()`, `Display`,
/// `From<String>`, `From<&str>`, `AsRef<str>`, and `PartialEq<&str>`.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        pub struct $name:ident;
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Generate a new random ID.
            pub fn new() -> Self {
                Self(nanoid::nanoid!(ID_LEN))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }
    };
}

define_id! {
    /// Unique identifier for a job record.
    pub struct JobId;
}

define_id! {
    /// Unique identifier for an uploaded blob.
    pub struct BlobId;
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
