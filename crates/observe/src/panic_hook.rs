/// Logs panics with `tracing::error!` before handing them to the previously
/// installed hook, so they show up in structured log output.
pub fn install() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        ::tracing::error!(%info, "thread panicked");
        previous(info);
    }));
}
