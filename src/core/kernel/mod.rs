pub mod envelope;
pub mod signer;
pub mod transport;

pub use signer::{HmacSigner, Signer};
pub use transport::{HttpTransport, RawResponse, ReqwestTransport};
