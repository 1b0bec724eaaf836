//! End-to-end dispatch through the registry.

mod common;

use common::{NS, echo_id, label, users_and_files};
use sci::{
    Action, Arguments, DispatchError, DispatchOutcome, Dispatcher, Method, Params,
    RegistryBuilder, Request, Response, Route, TableResolver, invocable,
    testing::{CountingAction, RecordingResolver},
};

fn text(body: &str) -> DispatchOutcome {
    DispatchOutcome::Handled(Response::Text(body.to_string()))
}

#[tokio::test]
async fn test_echo_id() {
    let mut builder = RegistryBuilder::new();
    users_and_files(&mut builder);
    let dispatcher = Dispatcher::new(builder.build());

    let outcome = dispatcher
        .dispatch(&Request::get(NS, "/users/42"))
        .await
        .unwrap();
    assert_eq!(outcome, text("42"));
}

#[tokio::test]
async fn test_method_mismatch_is_no_match() {
    let mut builder = RegistryBuilder::new();
    users_and_files(&mut builder);
    let dispatcher = Dispatcher::new(builder.build());

    let outcome = dispatcher
        .dispatch(&Request::post(NS, "/users/42"))
        .await
        .unwrap();
    assert_eq!(outcome, DispatchOutcome::NoMatch);
}

#[tokio::test]
async fn test_trailing_slash_is_accepted() {
    let mut builder = RegistryBuilder::new();
    users_and_files(&mut builder);
    let dispatcher = Dispatcher::new(builder.build());

    let outcome = dispatcher
        .dispatch(&Request::get(NS, "/users/42/"))
        .await
        .unwrap();
    assert_eq!(outcome, text("42"));
}

#[tokio::test]
async fn test_optional_parameter_absent_and_present() {
    let mut builder = RegistryBuilder::new();
    users_and_files(&mut builder);
    let resolver = RecordingResolver::new().with_response("files.index", "files");
    let dispatcher = Dispatcher::builder(builder.build())
        .resolver(resolver.clone())
        .build();

    assert_eq!(
        dispatcher.dispatch(&Request::get(NS, "/files")).await.unwrap(),
        text("files")
    );
    assert_eq!(
        dispatcher
            .dispatch(&Request::post(NS, "/files/report"))
            .await
            .unwrap(),
        text("files")
    );

    let calls = resolver.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].0, "files.index");
    assert_eq!(calls[0].1, Some(Params::new().with_absent("name")));
    assert_eq!(calls[1].1, Some(Params::new().with("name", "report")));
}

#[tokio::test]
async fn test_declaration_order_wins() {
    let mut builder = RegistryBuilder::new();
    Route::commit(&mut builder, NS, "get", "items/{id}", label("by-id")).unwrap();
    Route::commit(&mut builder, NS, "get", "items/latest", label("latest")).unwrap();
    let dispatcher = Dispatcher::new(builder.build());

    let outcome = dispatcher
        .dispatch(&Request::get(NS, "/items/latest"))
        .await
        .unwrap();
    assert_eq!(outcome, text("by-id"));

    let mut builder = RegistryBuilder::new();
    Route::commit(&mut builder, NS, "get", "items/latest", label("latest")).unwrap();
    Route::commit(&mut builder, NS, "get", "items/{id}", label("by-id")).unwrap();
    let dispatcher = Dispatcher::new(builder.build());

    let outcome = dispatcher
        .dispatch(&Request::get(NS, "/items/latest"))
        .await
        .unwrap();
    assert_eq!(outcome, text("latest"));
}

#[tokio::test]
async fn test_where_refinement() {
    let mut builder = RegistryBuilder::new();
    Route::get(NS, "users/{id}", echo_id())
        .unwrap()
        .where_param("id", r"\d+")
        .unwrap()
        .register(&mut builder, None)
        .unwrap();
    let dispatcher = Dispatcher::new(builder.build());

    let outcome = dispatcher
        .dispatch(&Request::get(NS, "/users/abc"))
        .await
        .unwrap();
    assert_eq!(outcome, DispatchOutcome::NoMatch);

    let outcome = dispatcher
        .dispatch(&Request::get(NS, "/users/7"))
        .await
        .unwrap();
    assert_eq!(outcome, text("7"));
}

#[tokio::test]
async fn test_arguments_bound_by_name() {
    let counter = CountingAction::new(["slug", "id", "unused"]);
    let mut builder = RegistryBuilder::new();
    Route::get(NS, "posts/{id}/{slug?}", Action::invocable(counter.clone()))
        .unwrap()
        .register(&mut builder, None)
        .unwrap();
    let dispatcher = Dispatcher::new(builder.build());

    dispatcher
        .dispatch(&Request::get(NS, "/posts/3"))
        .await
        .unwrap();

    let args = counter.last_arguments().unwrap();
    assert_eq!(args.len(), 2);
    assert_eq!(args.get("id"), Some("3"));
    assert!(args.is_bound("slug"));
    assert_eq!(args.get("slug"), None);
    assert!(!args.is_bound("unused"));
    assert_eq!(
        args.params().names().collect::<Vec<_>>(),
        ["slug", "id"]
    );
}

#[tokio::test]
async fn test_action_failure_is_reported() {
    let counter = CountingAction::new([]).failing("boom");
    let mut builder = RegistryBuilder::new();
    Route::get(NS, "fail", Action::invocable(counter.clone()))
        .unwrap()
        .register(&mut builder, Some("fail"))
        .unwrap();
    let dispatcher = Dispatcher::new(builder.build());

    let err = dispatcher
        .dispatch(&Request::get(NS, "/fail"))
        .await
        .unwrap_err();
    match err {
        DispatchError::Invocation { route, source } => {
            assert_eq!(route, "fail");
            assert_eq!(source.to_string(), "boom");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(counter.count(), 1);
}

#[tokio::test]
async fn test_delegated_action_not_found() {
    let mut builder = RegistryBuilder::new();
    Route::commit(&mut builder, NS, "get", "dashboard", "dashboard.show").unwrap();
    let dispatcher = Dispatcher::builder(builder.build())
        .resolver(TableResolver::default())
        .build();

    let err = dispatcher
        .dispatch(&Request::get(NS, "/dashboard"))
        .await
        .unwrap_err();
    assert!(matches!(err, DispatchError::ActionNotFound(ref id) if id == "dashboard.show"));
}

#[tokio::test]
async fn test_delegated_through_table() {
    let show = invocable(["id"], |args: Arguments| async move {
        format!("user #{}", args.get("id").unwrap_or("?"))
    });
    let mut builder = RegistryBuilder::new();
    Route::commit(&mut builder, NS, "get", "users/{id}", "users.show").unwrap();
    Route::commit(&mut builder, NS, "get", "users", "users.show").unwrap();
    let dispatcher = Dispatcher::builder(builder.build())
        .resolver(TableResolver::builder().action("users.show", show).build())
        .build();

    assert_eq!(
        dispatcher.dispatch(&Request::get(NS, "/users/5")).await.unwrap(),
        text("user #5")
    );
    assert_eq!(
        dispatcher.dispatch(&Request::get(NS, "/users")).await.unwrap(),
        text("user #?")
    );
}

#[tokio::test]
async fn test_file_action() {
    let dir = tempfile::tempdir().unwrap();
    let page = dir.path().join("page.html");
    std::fs::write(&page, "<h1>{name}</h1>").unwrap();

    let mut builder = RegistryBuilder::new();
    Route::commit(&mut builder, NS, "get", "pages/{name}", page.to_str().unwrap()).unwrap();
    let registry = builder.build();
    assert!(matches!(
        registry.iter().next().unwrap().route().action(),
        Action::File(_)
    ));

    let dispatcher = Dispatcher::new(registry);
    let outcome = dispatcher
        .dispatch(&Request::get(NS, "/pages/about"))
        .await
        .unwrap();
    assert_eq!(outcome, text("<h1>about</h1>"));
}

#[tokio::test]
async fn test_missing_file_action() {
    let mut builder = RegistryBuilder::new();
    Route::commit(
        &mut builder,
        NS,
        "get",
        "gone",
        Action::file("/no/such/dir/page.html"),
    )
    .unwrap();
    let dispatcher = Dispatcher::new(builder.build());

    let err = dispatcher
        .dispatch(&Request::get(NS, "/gone"))
        .await
        .unwrap_err();
    assert!(matches!(err, DispatchError::Include(_)));
}

#[tokio::test]
async fn test_dispatch_route_and_concurrency() {
    let mut builder = RegistryBuilder::new();
    users_and_files(&mut builder);
    Route::commit(&mut builder, "other", "get", "users/{id}", label("other")).unwrap();
    let dispatcher = Dispatcher::new(builder.build());

    let requests = ["/myplugin/v1/users/1", "/other/users/2", "/myplugin/v2/users/3"];
    let outcomes = futures::future::join_all(
        requests
            .iter()
            .map(|route| dispatcher.dispatch_route(Method::Get, route)),
    )
    .await;

    let outcomes: Vec<_> = outcomes.into_iter().map(Result::unwrap).collect();
    assert_eq!(outcomes, [text("1"), text("other"), DispatchOutcome::NoMatch]);
}
