mod template;
pub(crate) mod util;
