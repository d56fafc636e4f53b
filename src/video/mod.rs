pub mod sink;
pub mod source;

pub use sink::VideoSink;
pub use source::VideoSource;
