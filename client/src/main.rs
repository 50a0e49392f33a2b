mod arrows;
mod boot;
mod console;
mod host;
mod listeners;
mod page;
mod render_loop;

fn main() {
    console_error_panic_hook::set_once();
    listeners::bind_all();
    boot::initialize();
}
