use chat_rooms::{api, Config, RoomRegistry};
use clap::Parser;
use warp::Filter;

#[tokio::main]
async fn main() {
    pretty_env_logger::init();

    let config = Config::parse();

    // Keep track of all rooms and their respective members
    let registry = RoomRegistry::new();

    let routes = api::build_filters(registry, config.static_dir.clone())
        .with(warp::log("chat_rooms::api"));

    let addr = config.socket_addr();
    log::info!("listening on {}", addr);
    warp::serve(routes).run(addr).await;
}
