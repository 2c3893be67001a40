use hyper::StatusCode;
use lever::{
    AppConfig, app,
    handler::{
        Handler, MiddlewareResult, Request, Response, handler,
        middleware::{next, stop},
    },
    router::{Middlewares, Router},
    toolkit::{MethodOverride, RequestLogger},
};
use serde_json::json;
use std::{
    collections::BTreeMap,
    sync::{Arc, RwLock},
};

const PORT: u16 = 8080;
const API_KEY: &str = "letmein";

type Store = Arc<RwLock<BTreeMap<u64, String>>>;

/// Per-request state: the shared store plus the id captured from the path.
struct Items {
    store: Store,
    id: Option<u64>,
}

fn items(
    store: &Store,
    build: fn(Arc<Items>) -> Handler,
) -> impl Fn(Vec<String>) -> (Arc<Items>, Handler) + Send + Sync + 'static {
    let store = store.clone();
    move |captures: Vec<String>| {
        let state = Arc::new(Items {
            store: store.clone(),
            id: captures.first().and_then(|id| id.parse().ok()),
        });
        (state.clone(), build(state))
    }
}

fn list(state: Arc<Items>) -> Handler {
    handler(move |res, _req| {
        let Ok(store) = state.store.read() else {
            *res = Response::internal_error();
            return;
        };
        if res.json(&*store).is_err() {
            *res = Response::internal_error();
        }
    })
}

fn show(state: Arc<Items>) -> Handler {
    handler(move |res, _req| {
        let found = state
            .id
            .and_then(|id| state.store.read().ok()?.get(&id).cloned());
        match found {
            Some(name) => {
                if res.json(json!({ "id": state.id, "name": name })).is_err() {
                    *res = Response::internal_error();
                }
            }
            None => {
                res.status(StatusCode::NOT_FOUND).send("no such item");
            }
        }
    })
}

fn create(state: Arc<Items>) -> Handler {
    handler(move |res, req: Request| {
        let name = String::from_utf8_lossy(req.body()).trim().to_string();
        let Ok(mut store) = state.store.write() else {
            *res = Response::internal_error();
            return;
        };
        let id = store.keys().next_back().map_or(1, |last| last + 1);
        store.insert(id, name);
        res.status(StatusCode::CREATED).send(id.to_string());
    })
}

fn remove(state: Arc<Items>) -> Handler {
    handler(move |res, _req| {
        let removed = state
            .id
            .and_then(|id| state.store.write().ok()?.remove(&id));
        match removed {
            Some(_) => res.status(StatusCode::NO_CONTENT),
            None => res.status(StatusCode::NOT_FOUND).send("no such item"),
        };
    })
}

fn require_key(_state: &Arc<Items>, mut res: Response, req: Request) -> MiddlewareResult {
    let authorized = req
        .headers()
        .get("x-api-key")
        .is_some_and(|key| key.as_bytes() == API_KEY.as_bytes());

    if !authorized {
        res.status(StatusCode::UNAUTHORIZED).send("401 Unauthorized");
        return stop(res);
    }
    next(res, req)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let store: Store = Arc::default();

    let public = Middlewares::new().with(RequestLogger);
    let private = public.extend(&Middlewares::new().with(require_key));

    let router = Router::new(vec![
        public.get("/items", items(&store, list))?,
        public.get("/items/([0-9]+)", items(&store, show))?,
        private.post("/items", items(&store, create))?,
        private.del("/items/([0-9]+)", items(&store, remove))?,
    ])
    .with_preprocessor(MethodOverride::default());

    app(router)
        .with_config(AppConfig::default().port(PORT))
        .listen(|addr| println!("Server listening on {}", addr))
        .await?;

    Ok(())
}
