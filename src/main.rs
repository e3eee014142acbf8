fn main() {
    if let Err(err) = ocean_scene::run() {
        eprintln!("Application error: {err}");
    }
}
