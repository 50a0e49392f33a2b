const PREFIX: &str = "[spiral-scroll]";

pub(crate) fn info(message: &str) {
    web_sys::console::info_1(&format!("{PREFIX} {message}").into());
}

pub(crate) fn warn(message: &str) {
    web_sys::console::warn_1(&format!("{PREFIX} {message}").into());
}
