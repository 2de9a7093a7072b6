use std::sync::Arc;

use log::info;
use warp::Filter;

use lost_found::config::Config;
use lost_found::server::{ws_route, Server};

#[tokio::main]
async fn main() {
    env_logger::init();

    let config = Config::from_env();
    info!(
        "Report policy {:?}, flash notices last {:?}",
        config.store.report_policy, config.store.flash_duration
    );

    let server = Arc::new(Server::new(config.store));

    let static_files = warp::fs::dir(config.public_dir.clone());

    let routes = ws_route(server)
        .or(static_files)
        .with(warp::cors().allow_any_origin());

    info!("Server starting on {}...", config.addr);
    warp::serve(routes).run(config.addr).await;
}
