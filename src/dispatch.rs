//! The typed dispatcher (C5): walks a method's declared parameter-kind
//! list, pulling each value from either the next path capture or the
//! request's query/form/entity/headers, and invokes the handler.

use crate::http::request::Request;
use crate::http::response::Response;
use crate::params::parse_path_int;
use crate::resource::{MethodBinding, ParamKind, ParamValue};

/// Builds the argument list for `binding` from `captures` and `request`,
/// then invokes the handler. An integer path variable that fails to parse
/// produces a `500` response carrying the failure text instead of
/// invoking the handler — the handler never sees a malformed argument
/// list.
pub fn dispatch(binding: &MethodBinding, captures: &[String], request: &Request) -> Response {
    let mut args = Vec::with_capacity(binding.params.len());
    let mut path_index = 0usize;

    for kind in &binding.params {
        let value = match kind {
            ParamKind::PathString => {
                let v = ParamValue::PathString(captures[path_index].clone());
                path_index += 1;
                v
            }
            ParamKind::PathInt(width) => {
                match parse_path_int(&captures[path_index], *width) {
                    Ok(parsed) => {
                        path_index += 1;
                        ParamValue::PathInt(parsed)
                    }
                    Err(err) => return Response::internal_error(err.to_string()),
                }
            }
            ParamKind::Query => ParamValue::Query(request.query.clone()),
            ParamKind::Form => ParamValue::Form(request.form.clone()),
            ParamKind::Entity => ParamValue::Entity(request.entity.clone()),
            ParamKind::Headers => ParamValue::Headers(request.headers.clone()),
        };
        args.push(value);
    }

    (binding.handler)(&args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::method::HttpMethod;
    use crate::params::{Entity, FormParams, Headers, IntWidth, QueryParams};
    use crate::resource::MethodBinding;

    fn sample_request() -> Request {
        Request {
            path: "/users/7".to_string(),
            method: HttpMethod::Get,
            headers: Headers::new(),
            query: QueryParams::new(),
            form: FormParams::new(),
            entity: Entity::new(Vec::new()),
        }
    }

    #[test]
    fn string_path_variable_advances_index() {
        let binding = MethodBinding::new(vec![ParamKind::PathString], |args| {
            let ParamValue::PathString(s) = &args[0] else { unreachable!() };
            Response::text(crate::http::response::StatusCode::Ok, s.clone())
        });
        let resp = dispatch(&binding, &["alice".to_string()], &sample_request());
        assert_eq!(resp.body, b"alice");
    }

    #[test]
    fn integer_path_variable_parse_failure_yields_500() {
        let binding = MethodBinding::new(vec![ParamKind::PathInt(IntWidth::U32)], |_args| {
            Response::text(crate::http::response::StatusCode::Ok, "unreachable")
        });
        let resp = dispatch(&binding, &["not-a-number".to_string()], &sample_request());
        assert_eq!(resp.status.code(), 500);
    }

    #[test]
    fn non_path_kinds_do_not_advance_path_index() {
        let binding = MethodBinding::new(
            vec![ParamKind::Query, ParamKind::PathString, ParamKind::Headers],
            |args| {
                let ParamValue::PathString(s) = &args[1] else { unreachable!() };
                Response::text(crate::http::response::StatusCode::Ok, s.clone())
            },
        );
        let resp = dispatch(&binding, &["bob".to_string()], &sample_request());
        assert_eq!(resp.body, b"bob");
    }
}
