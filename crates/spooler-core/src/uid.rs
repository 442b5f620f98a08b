// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Content-hash job identity.

use sha1::{Digest, Sha1};
use smol_str::SmolStr;

/// Content-hash identifier of a job.
///
/// Computed as `hex(sha1(raw_config_bytes))` from the job file's bytes
/// (or, for the `timestamp = on_parsing` escape hatch, from the resolved
/// timestamp string instead — see [`JobUid::from_timestamp`]). Backed by
/// a `SmolStr` rather than a fixed-size array: a `deletejobs` request's
/// `ids` (§4.1 step 6) are *literal* uid strings copied verbatim from
/// another job, not bytes to re-hash, and test fixtures exercise them at
/// lengths shorter than a real 40-character digest (see
/// [`JobUid::from_literal`]).
#[derive(Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct JobUid(SmolStr);

impl JobUid {
    /// Hash raw job-file bytes into a uid.
    pub fn from_bytes(raw: &[u8]) -> Self {
        Self::from_digest_input(raw)
    }

    /// Testing-only escape hatch: derive the uid from a timestamp string
    /// rather than the raw job-file bytes, so repeated fixtures with
    /// `timestamp = on_parsing` don't collide. See SPEC_FULL.md §9.
    pub fn from_timestamp(high_precision_timestamp: &str) -> Self {
        Self::from_digest_input(high_precision_timestamp.as_bytes())
    }

    /// Take a string as a uid exactly as written, with no hashing. Used
    /// for `deletejobs`' `ids` list (§4.1 step 6): those entries already
    /// *are* another job's uid, copied verbatim from its status JSON.
    pub fn from_literal(literal: &str) -> Self {
        Self(SmolStr::new(literal))
    }

    fn from_digest_input(input: &[u8]) -> Self {
        let digest = Sha1::digest(input);
        let mut buf = [0u8; 40];
        for (i, byte) in digest.iter().enumerate() {
            buf[i * 2] = HEX[(byte >> 4) as usize];
            buf[i * 2 + 1] = HEX[(byte & 0x0f) as usize];
        }
        // Invariant: `buf` is always populated with ASCII hex digits.
        Self(SmolStr::new(std::str::from_utf8(&buf).unwrap_or_default()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Truncated form used in log lines (`%.7s` in the original manager).
    /// Falls back to the whole string for the shorter literal uids a
    /// `deletejobs` test fixture or `from_literal` caller might produce.
    pub fn short(&self) -> &str {
        let s = self.as_str();
        s.get(..7).unwrap_or(s)
    }
}

impl std::fmt::Debug for JobUid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "JobUid({:?})", self.as_str())
    }
}

impl std::fmt::Display for JobUid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::borrow::Borrow<str> for JobUid {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl AsRef<str> for JobUid {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

const HEX: [u8; 16] = *b"0123456789abcdef";

#[cfg(test)]
#[path = "uid_tests.rs"]
mod tests;
