pub mod client_validator;
pub mod decision;
pub mod token_issuer;
pub mod token_verifier;
