//! Integration tests for the `#[sci::action]` macro.

#![cfg(feature = "macros")]

mod common;

use common::NS;
use sci::{
    Action, Arguments, DispatchError, DispatchOutcome, Dispatcher, Invocable, Params,
    RegistryBuilder, Request, Response, Route,
};

/// Echoes the id.
#[sci::action]
async fn show_user(id: u64) -> String {
    format!("user {id}")
}

#[sci::action]
async fn list_files(dir: String, name: Option<String>) -> String {
    match name {
        Some(name) => format!("{dir}/{name}"),
        None => format!("{dir}/*"),
    }
}

#[sci::action]
fn ping() -> &'static str {
    "pong"
}

#[sci::action(name = "Divide")]
async fn divide(a: i32, b: i32) -> Result<String, String> {
    if b == 0 {
        return Err("division by zero".to_string());
    }
    Ok((a / b).to_string())
}

#[test]
fn test_parameter_names() {
    assert_eq!(show_user.parameters(), &["id"]);
    assert_eq!(list_files::PARAMETERS, &["dir", "name"]);
    assert!(ping.parameters().is_empty());
    assert_eq!(Divide.parameters(), &["a", "b"]);
}

#[tokio::test]
async fn test_invoke_directly() {
    let args = Arguments::bind(show_user::PARAMETERS, &Params::new().with("id", "12"));
    let out = show_user.invoke(args).await.unwrap();
    assert_eq!(out, Response::Text("user 12".into()));

    let args = Arguments::bind(show_user::PARAMETERS, &Params::new().with("id", "x"));
    let err = show_user.invoke(args).await.unwrap_err();
    assert!(err.to_string().contains("id"));
}

#[tokio::test]
async fn test_macro_actions_in_routes() {
    let mut builder = RegistryBuilder::new();
    Route::get(NS, "users/{id}", show_user)
        .unwrap()
        .where_param("id", r"\d+")
        .unwrap()
        .register(&mut builder, None)
        .unwrap();
    Route::get(NS, "files/{dir}/{name?}", list_files)
        .unwrap()
        .register(&mut builder, None)
        .unwrap();
    Route::get(NS, "ping", Action::from(ping))
        .unwrap()
        .register(&mut builder, None)
        .unwrap();
    Route::get(NS, "divide/{a}/{b}", Divide)
        .unwrap()
        .register(&mut builder, Some("divide"))
        .unwrap();
    let dispatcher = Dispatcher::new(builder.build());

    let cases = [
        ("/users/3", "user 3"),
        ("/files/docs", "docs/*"),
        ("/files/docs/a", "docs/a"),
        ("/ping", "pong"),
        ("/divide/9/3", "3"),
    ];
    for (path, expected) in cases {
        let outcome = dispatcher.dispatch(&Request::get(NS, path)).await.unwrap();
        assert_eq!(
            outcome,
            DispatchOutcome::Handled(Response::Text(expected.into())),
            "{path}"
        );
    }

    let err = dispatcher
        .dispatch(&Request::get(NS, "/divide/1/0"))
        .await
        .unwrap_err();
    assert!(matches!(err, DispatchError::Invocation { ref route, .. } if route == "divide"));
}
