fn main() -> Result<(), eframe::Error> {
    // Set up logging for development
    env_logger::init();

    // File dialogs are spawned as async tasks from the UI thread, so the
    // runtime has to exist before the event loop starts.
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("failed to start async runtime");
    let _guard = runtime.enter();

    // Run the node canvas application
    node_canvas::run_app()
}
