mod basejoin;
mod codec;
mod parse;

pub use basejoin::base_join;
pub(crate) use codec::{decode_segment, encode_segment};
pub use parse::parse_pathname;
