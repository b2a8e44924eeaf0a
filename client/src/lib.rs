mod client;
mod response;

pub mod prelude {
    pub use crate::client::HttpClientInstrumented;
    pub use crate::response::ResponseDescriptor;
}
