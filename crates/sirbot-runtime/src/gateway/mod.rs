//! Production gateways backed by HTTP.

mod links;
mod slack;

pub use links::HttpLinkChecker;
pub use slack::SlackWebApi;
