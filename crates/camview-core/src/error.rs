use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq, Hash, Copy)]
pub enum DropReason {
    #[error("Malformed length header")]
    MalformedLength,

    #[error("Truncated payload")]
    TruncatedPayload,

    #[error("Short payload")]
    ShortPayload,

    #[error("Bad payload encoding")]
    BadEncoding,

    #[error("Bad image container")]
    BadImage,

    #[error("Connection error")]
    ConnectionError,
}

impl DropReason {
    pub const ALL: [DropReason; 6] = [
        DropReason::MalformedLength,
        DropReason::TruncatedPayload,
        DropReason::ShortPayload,
        DropReason::BadEncoding,
        DropReason::BadImage,
        DropReason::ConnectionError,
    ];
}
