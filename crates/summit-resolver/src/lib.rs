pub mod chain;
pub mod events;
pub mod fetch;
pub mod images;

pub mod mock;

pub use events::{EventResolver, Resolution};
pub use fetch::{FetchedImage, Fetcher, HttpFetcher};
pub use images::{ImageKind, ImageReply, ImageResolver, PathGenerator};
