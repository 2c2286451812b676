//! IPFS storage subsystem.
//!
//! # Data Flow
//! ```text
//! POST /add-file {data}
//!     → service.rs (reject empty data, UUID file name)
//!     → pinata.rs (pinFileToIPFS, bearer JWT) → CID
//!     → storage (register CID)
//!
//! GET /get-file/:fileHash
//!     → storage (CID must be registered)
//!     → pinata.rs (gateway fetch, JSON or text)
//! ```

pub mod pinata;
pub mod service;

pub use pinata::{FileContent, PinataClient, PinningError, PinningProvider};
pub use service::{FileError, FileService};
