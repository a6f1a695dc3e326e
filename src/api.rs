use std::{convert::Infallible, path::PathBuf};

use warp::{filters::BoxedFilter, fs::File, Filter};

use crate::{room::RoomRegistry, ws::user_connected};

static INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
    <head>
        <title>Chat Rooms</title>
    </head>
    <body>
        <h1 id="title">Chat</h1>
        <ul id="messages">
            <li><em>Connecting...</em></li>
        </ul>
        <form id="form">
            <input type="text" id="message" autocomplete="off" />
            <button type="submit">Send</button>
        </form>
        <script type="text/javascript">
        const messages = document.getElementById('messages');
        const form = document.getElementById('form');
        const input = document.getElementById('message');
        const room = location.pathname.split('/').pop();
        document.getElementById('title').innerText = 'Chat: ' + room;
        const username = (prompt('Enter your username:') || 'anonymous').toLowerCase();
        const ws = new WebSocket('ws://' + location.host + '/chat/' + room);
        function show(msg) {
            const item = document.createElement('li');
            if (msg.type === 'note') {
                const note = document.createElement('i');
                note.textContent = msg.text;
                item.appendChild(note);
            } else if (msg.type === 'chat') {
                const name = document.createElement('b');
                name.textContent = msg.name + ': ';
                item.appendChild(name);
                item.appendChild(document.createTextNode(msg.text));
            }
            messages.appendChild(item);
        }
        ws.onopen = function() {
            messages.innerHTML = '';
            ws.send(JSON.stringify({ type: 'join', name: username }));
        };
        ws.onmessage = function(e) {
            show(JSON.parse(e.data));
        };
        ws.onclose = function() {
            show({ type: 'note', text: 'Disconnected!' });
        };
        form.onsubmit = function(e) {
            e.preventDefault();
            ws.send(JSON.stringify({ type: 'chat', text: input.value }));
            input.value = '';
        };
        </script>
    </body>
</html>
"#;

// GET /{room: str} -> index html to join room
fn room() -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::path!(String)
        .and(warp::get())
        .map(|_| warp::reply::html(INDEX_HTML))
}

fn with_registry(
    registry: RoomRegistry,
) -> impl Filter<Extract = (RoomRegistry,), Error = Infallible> + Clone {
    warp::any().map(move || registry.clone())
}

async fn list_rooms(registry: RoomRegistry) -> Result<impl warp::Reply, Infallible> {
    Ok(warp::reply::json(&registry.summaries().await))
}

// GET /rooms -> [{"name": str, "members": int}]
fn rooms(
    registry: RoomRegistry,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::path!("rooms")
        .and(warp::get())
        .and(with_registry(registry))
        .and_then(list_rooms)
}

// GET /{path..} -> files under the static dir, when one is configured
fn static_files(dir: Option<PathBuf>) -> BoxedFilter<(File,)> {
    match dir {
        Some(dir) => warp::fs::dir(dir).boxed(),
        None => warp::any()
            .and_then(|| async { Err::<File, _>(warp::reject::not_found()) })
            .boxed(),
    }
}

async fn upgrade_connection(
    room_name: String,
    ws: warp::ws::Ws,
    registry: RoomRegistry,
) -> Result<impl warp::Reply, Infallible> {
    let room = registry.get(&room_name).await;
    // This will call our function if the handshake succeeds.
    Ok(ws.on_upgrade(move |socket| user_connected(socket, room)))
}

// GET /chat/{room: str}-> websocket upgrade
fn ws_upgrade(
    registry: RoomRegistry,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::path!("chat" / String)
        // The `ws()` filter will prepare Websocket handshake...
        .and(warp::ws())
        .and(with_registry(registry))
        .and_then(upgrade_connection)
}

pub fn build_filters(
    registry: RoomRegistry,
    static_dir: Option<PathBuf>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    rooms(registry.clone())
        .or(static_files(static_dir))
        .or(room())
        .or(ws_upgrade(registry))
}
