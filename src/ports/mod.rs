pub mod fs;
pub mod http;

pub use fs::{FileSystem, MemFs, RealFs};
pub use http::{DownloadedArchive, HttpSdkFetcher, MockSdkFetcher, SdkFetcher};
