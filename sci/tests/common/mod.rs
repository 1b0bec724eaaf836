#![allow(dead_code)]

use sci::{Action, Arguments, Dispatcher, Registry, RegistryBuilder, Route, invocable};
use std::sync::{Arc, Mutex};

pub const NS: &str = "myplugin/v1";

// ============================================================================
// Test Actions
// ============================================================================

/// Echoes the `id` parameter.
pub fn echo_id() -> Action {
    Action::invocable(invocable(["id"], |args: Arguments| async move {
        args.get("id").unwrap_or("-").to_string()
    }))
}

/// Answers with a fixed label.
pub fn label(text: &'static str) -> Action {
    Action::invocable(invocable([], move |_args: Arguments| async move { text }))
}

/// Records the arguments it receives, in call order.
pub fn recording(names: &'static [&'static str], log: Arc<Mutex<Vec<Arguments>>>) -> Action {
    Action::invocable(invocable(names.iter().copied(), move |args: Arguments| {
        let log = Arc::clone(&log);
        async move {
            log.lock().unwrap().push(args);
        }
    }))
}

// ============================================================================
// Fixtures
// ============================================================================

/// The `users/{id}` + `files/{name?}` fixture.
pub fn users_and_files(builder: &mut RegistryBuilder) {
    Route::get(NS, "users/{id}", echo_id())
        .unwrap()
        .register(builder, Some("users.show"))
        .unwrap();
    Route::commit(builder, NS, ["get", "post"], "files/{name?}", "files.index").unwrap();
}

pub fn dispatcher(registry: Registry) -> Dispatcher {
    Dispatcher::new(registry)
}
