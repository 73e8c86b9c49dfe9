//! Recipient address verification through the Hunter email-verifier API.

mod client;
mod types;

pub use client::{EmailVerifier, HunterClient};
pub use types::{
    VerificationDetails, VerificationError, VerificationReport, VerificationResult,
    VerifierRecord, SAFE_SCORE_THRESHOLD,
};
