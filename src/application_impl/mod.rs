mod invalidation_ledger;
mod login_service_fake;
mod session_service_impl;
mod token_codec_jwt;

pub use invalidation_ledger::*;
pub use login_service_fake::*;
pub use session_service_impl::*;
pub use token_codec_jwt::*;
