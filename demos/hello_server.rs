//! Port of the original `hello_server` example: five resources exercising
//! every parameter kind, plus the admin `/ping` endpoint.

use std::sync::Arc;
use waypost::prelude::*;

fn hello_resource() -> waypost::Resource {
    ResourceBuilder::new("/")
        .get(Vec::new(), |_args| Response::text(StatusCode::Ok, "Hello, World\n"))
        .build()
}

fn hello_param_resource() -> waypost::Resource {
    ResourceBuilder::new("/{user}")
        .get(vec![ParamKind::PathString], |args| {
            let ParamValue::PathString(user) = &args[0] else { unreachable!() };
            Response::text(StatusCode::Ok, format!("Hello, {}\n", user))
        })
        .build()
}

fn hello_double_param_resource() -> waypost::Resource {
    let get_params = vec![ParamKind::PathString, ParamKind::PathString];
    let put_params = vec![ParamKind::PathString, ParamKind::PathString, ParamKind::Entity];

    ResourceBuilder::new("/{user}/{message}")
        .get(get_params, |args| {
            let ParamValue::PathString(user) = &args[0] else { unreachable!() };
            let ParamValue::PathString(message) = &args[1] else { unreachable!() };
            Response::text(StatusCode::Ok, format!("Hello, {}, {}\n", user, message))
        })
        .put(put_params, |args| {
            let ParamValue::PathString(user) = &args[0] else { unreachable!() };
            let ParamValue::PathString(message) = &args[1] else { unreachable!() };
            let ParamValue::Entity(body) = &args[2] else { unreachable!() };
            Response::text(
                StatusCode::Ok,
                format!("PUT Hello, {}, {}: {}\n", user, message, body.as_string()),
            )
        })
        .build()
}

fn hello_query_param_resource() -> waypost::Resource {
    ResourceBuilder::new("/{user}/details/get")
        .get(vec![ParamKind::PathString, ParamKind::Query], |args| {
            let ParamValue::PathString(user) = &args[0] else { unreachable!() };
            let ParamValue::Query(query) = &args[1] else { unreachable!() };
            let value = query.get_first("query").unwrap_or("");
            Response::text(StatusCode::Ok, format!("Hello, {}, query: {}\n", user, value))
        })
        .build()
}

fn hello_post_param_resource() -> waypost::Resource {
    ResourceBuilder::new("/{user}/details/post")
        .post(vec![ParamKind::PathString, ParamKind::Form], |args| {
            let ParamValue::PathString(user) = &args[0] else { unreachable!() };
            let ParamValue::Form(form) = &args[1] else { unreachable!() };
            let value = form.get_first("form").unwrap_or("");
            Response::text(StatusCode::Ok, format!("Hello, {}, form: {}\n", user, value))
        })
        .build()
}

fn main() -> Result<()> {
    let port: u16 = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(31337);

    let server = Arc::new(Server::new("127.0.0.1", port)?);
    server.register_resource(hello_resource())?;
    server.register_resource(hello_param_resource())?;
    server.register_resource(hello_double_param_resource())?;
    server.register_resource(hello_query_param_resource())?;
    server.register_resource(hello_post_param_resource())?;

    server.start()?;
    server.start_admin_server("127.0.0.1", 0)?;
    server.wait();
    Ok(())
}
