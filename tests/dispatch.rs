use bytes::Bytes;
use hyper::{Method, StatusCode, header};
use lever::{
    handler::{
        Handler, Request, RequestExt, Response, handler,
        middleware::{MiddlewareResult, next, stop},
    },
    router::{Middlewares, Router},
    toolkit::MethodOverride,
};
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, Ordering},
};

fn request(method: Method, path: &str) -> Request {
    hyper::Request::builder()
        .method(method)
        .uri(path)
        .body(Bytes::new())
        .unwrap()
}

fn body(res: &Response) -> &str {
    std::str::from_utf8(res.body()).unwrap()
}

/// Factory answering with `name` and the captures it received.
fn reply(name: &'static str) -> impl Fn(Vec<String>) -> ((), Handler) + Send + Sync + 'static {
    move |captures: Vec<String>| {
        (
            (),
            handler(move |res: &mut Response, _req: Request| {
                res.send(format!("{name}{captures:?}"));
            }),
        )
    }
}

#[derive(Default)]
struct Flags {
    called: AtomicBool,
    middleware: AtomicBool,
}

#[test]
fn state_reaches_middleware_and_handler() {
    let flags = Arc::new(Flags::default());
    let shared = flags.clone();
    let get = move |_: Vec<String>| {
        let state = shared.clone();
        let handler_state = state.clone();
        (
            state,
            handler(move |_res: &mut Response, _req: Request| {
                handler_state.called.store(true, Ordering::SeqCst);
            }),
        )
    };
    let public = Middlewares::new().with(
        |state: &Arc<Flags>, res: Response, req: Request| {
            state.middleware.store(true, Ordering::SeqCst);
            next(res, req)
        },
    );
    let router = Router::new(vec![public.get("/", get).unwrap()]);

    router.serve(request(Method::GET, "/"));

    assert!(flags.called.load(Ordering::SeqCst), "handler was not called");
    assert!(flags.middleware.load(Ordering::SeqCst), "middleware was not called");
}

#[test]
fn items_example_end_to_end() {
    let chain = Middlewares::<()>::new();
    let router = Router::new(vec![chain.get("/items/([0-9]+)", reply("item")).unwrap()]);

    let ok = router.serve(request(Method::GET, "/items/42"));
    assert_eq!(ok.get_status(), StatusCode::OK);
    assert_eq!(body(&ok), r#"item["42"]"#);

    let missing = router.serve(request(Method::GET, "/items/abc"));
    assert_eq!(missing.get_status(), StatusCode::NOT_FOUND);
    assert!(missing.get("allow").is_none());

    let wrong_method = router.serve(request(Method::POST, "/items/42"));
    assert_eq!(wrong_method.get_status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(wrong_method.get("allow").unwrap(), "GET");
}

#[test]
fn non_overlapping_routes_dispatch_to_their_own_handler() {
    let chain = Middlewares::<()>::new();
    let router = Router::new(vec![
        chain.get("/users", reply("users")).unwrap(),
        chain.get("/users/([a-z]+)", reply("user")).unwrap(),
        chain.post("/posts", reply("posts")).unwrap(),
    ]);

    assert_eq!(body(&router.serve(request(Method::GET, "/users"))), "users[]");
    assert_eq!(
        body(&router.serve(request(Method::GET, "/users/ada"))),
        r#"user["ada"]"#
    );
    assert_eq!(body(&router.serve(request(Method::POST, "/posts"))), "posts[]");
}

#[test]
fn encoded_path_matches_and_captures_decoded_text() {
    let chain = Middlewares::<()>::new();
    let router = Router::new(vec![chain.get("/users/([a-z ]+)", reply("user")).unwrap()]);

    let res = router.serve(request(Method::GET, "/users/ada%20l"));
    assert_eq!(res.get_status(), StatusCode::OK);
    assert_eq!(body(&res), r#"user["ada l"]"#);

    let literal = router.serve(request(Method::GET, "/users/ada%2520l"));
    assert_eq!(literal.get_status(), StatusCode::NOT_FOUND);
}

#[test]
fn shared_path_dispatches_by_method_and_lists_both_on_405() {
    let chain = Middlewares::<()>::new();
    let router = Router::new(vec![
        chain.get("/doc", reply("get")).unwrap(),
        chain.del("/doc", reply("delete")).unwrap(),
    ]);

    assert_eq!(body(&router.serve(request(Method::GET, "/doc"))), "get[]");
    assert_eq!(body(&router.serve(request(Method::DELETE, "/doc"))), "delete[]");

    let res = router.serve(request(Method::PUT, "/doc"));
    assert_eq!(res.get_status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(res.headers().get(header::ALLOW).unwrap(), "GET, DELETE");
}

#[test]
fn unmatched_path_is_404_for_every_method() {
    let chain = Middlewares::<()>::new();
    let router = Router::new(vec![chain.all("/only", reply("only")).unwrap()]);

    for method in [Method::GET, Method::POST, Method::PUT, Method::DELETE] {
        let res = router.serve(request(method, "/elsewhere"));
        assert_eq!(res.get_status(), StatusCode::NOT_FOUND);
        assert_eq!(body(&res), "404 Not Found");
    }
}

#[test]
fn chain_runs_in_declaration_order_before_handler() {
    type Log = Arc<Mutex<Vec<&'static str>>>;
    let log: Log = Arc::default();

    fn step(name: &'static str) -> impl Fn(&Log, Response, Request) -> MiddlewareResult + Send + Sync + 'static {
        move |log: &Log, res: Response, req: Request| {
            log.lock().unwrap().push(name);
            next(res, req)
        }
    }

    let shared = log.clone();
    let factory = move |_: Vec<String>| {
        let state = shared.clone();
        let handler_log = state.clone();
        (
            state,
            handler(move |_res: &mut Response, _req: Request| {
                handler_log.lock().unwrap().push("handler");
            }),
        )
    };
    let chain = Middlewares::new().with(step("a")).with(step("b")).with(step("c"));
    let router = Router::new(vec![chain.get("/", factory).unwrap()]);

    router.serve(request(Method::GET, "/"));

    assert_eq!(*log.lock().unwrap(), vec!["a", "b", "c", "handler"]);
}

#[test]
fn stopping_middleware_skips_rest_and_handler() {
    type Log = Arc<Mutex<Vec<&'static str>>>;
    let log: Log = Arc::default();

    let shared = log.clone();
    let factory = move |_: Vec<String>| {
        let state = shared.clone();
        let handler_log = state.clone();
        (
            state,
            handler(move |_res: &mut Response, _req: Request| {
                handler_log.lock().unwrap().push("handler");
            }),
        )
    };
    let chain = Middlewares::new()
        .with(|log: &Log, mut res: Response, _req: Request| {
            log.lock().unwrap().push("auth");
            res.status(StatusCode::UNAUTHORIZED).send("denied");
            stop(res)
        })
        .with(|log: &Log, res: Response, req: Request| {
            log.lock().unwrap().push("after");
            next(res, req)
        });
    let router = Router::new(vec![chain.get("/private", factory).unwrap()]);

    let res = router.serve(request(Method::GET, "/private"));

    assert_eq!(res.get_status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body(&res), "denied");
    assert_eq!(*log.lock().unwrap(), vec!["auth"]);
}

#[test]
fn empty_chain_hands_original_request_to_handler() {
    let factory = |_: Vec<String>| {
        (
            (),
            handler(|res: &mut Response, req: Request| {
                let marker = req
                    .headers()
                    .get("x-marker")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("missing")
                    .to_owned();
                res.send(format!("{} {}", req.uri().path(), marker));
            }),
        )
    };
    let router = Router::new(vec![Middlewares::<()>::new().get("/plain", factory).unwrap()]);

    let mut req = request(Method::GET, "/plain");
    req.headers_mut()
        .insert("x-marker", "original".parse().unwrap());

    let res = router.serve(req);
    assert_eq!(res.get_status(), StatusCode::OK);
    assert_eq!(body(&res), "/plain original");
}

#[test]
fn earlier_route_shadows_identical_later_route() {
    let chain = Middlewares::<()>::new();
    let router = Router::new(vec![
        chain.get("/a", reply("first")).unwrap(),
        chain.get("/a", reply("second")).unwrap(),
    ]);

    for _ in 0..3 {
        assert_eq!(body(&router.serve(request(Method::GET, "/a"))), "first[]");
    }
}

#[test]
fn captures_are_visible_to_middleware() {
    let chain = Middlewares::<()>::new().with(|_: &(), mut res: Response, req: Request| {
        let id = req.captures().and_then(|c| c.get(0)).unwrap_or("none").to_owned();
        res.set("x-id", id.parse::<hyper::header::HeaderValue>().unwrap());
        next(res, req)
    });
    let router = Router::new(vec![chain.get("/items/([0-9]+)", reply("item")).unwrap()]);

    let res = router.serve(request(Method::GET, "/items/9"));
    assert_eq!(res.get("x-id").unwrap(), "9");
}

#[test]
fn html_form_reaches_delete_route_through_override() {
    let chain = Middlewares::<()>::new();
    let router = Router::new(vec![
        chain.get("/items/([0-9]+)", reply("show")).unwrap(),
        chain.del("/items/([0-9]+)", reply("delete")).unwrap(),
    ])
    .with_preprocessor(MethodOverride::default());

    let req = hyper::Request::builder()
        .method(Method::POST)
        .uri("/items/3")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Bytes::from_static(b"_method=DELETE"))
        .unwrap();

    let res = router.serve(req);
    assert_eq!(body(&res), r#"delete["3"]"#);

    let plain_post = router.serve(request(Method::POST, "/items/3"));
    assert_eq!(plain_post.get_status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(plain_post.get("allow").unwrap(), "GET, DELETE");
}

#[test]
fn router_serves_concurrently_from_threads() {
    let chain = Middlewares::<()>::new();
    let router = Arc::new(Router::new(vec![
        chain.get("/n/([0-9]+)", reply("n")).unwrap(),
    ]));

    let workers: Vec<_> = (0..8)
        .map(|i| {
            let router = Arc::clone(&router);
            std::thread::spawn(move || {
                let res = router.serve(request(Method::GET, &format!("/n/{i}")));
                body(&res).to_owned()
            })
        })
        .collect();

    for (i, worker) in workers.into_iter().enumerate() {
        assert_eq!(worker.join().unwrap(), format!(r#"n["{i}"]"#));
    }
}
