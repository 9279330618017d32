//! Resource registry and the capability-set resource model (C3).
//!
//! Resources are not an inheritance tree: a [`Resource`] is a path
//! template plus a [`MethodTable`] of zero-or-more declared method
//! bindings, each a closed-over handler with its own ordered parameter
//! signature. Declaring a method for a verb is what makes it dispatchable;
//! an undeclared verb naturally falls through to `405`.

use crate::http::method::HttpMethod;
use crate::http::response::Response;
use crate::params::{Entity, FormParams, Headers, IntWidth, PathInt, PathString, QueryParams};
use std::sync::Arc;

/// One declared parameter's kind, in the order the handler expects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    PathString,
    PathInt(IntWidth),
    Query,
    Form,
    Entity,
    Headers,
}

/// The concrete value extracted for one declared [`ParamKind`].
#[derive(Debug, Clone)]
pub enum ParamValue {
    PathString(PathString),
    PathInt(PathInt),
    Query(QueryParams),
    Form(FormParams),
    Entity(Entity),
    Headers(Headers),
}

/// A resource method: its declared parameter signature and the handler
/// invoked once the dispatcher has assembled a matching argument list.
pub struct MethodBinding {
    pub params: Vec<ParamKind>,
    pub handler: Box<dyn Fn(&[ParamValue]) -> Response + Send + Sync>,
}

impl MethodBinding {
    pub fn new(
        params: Vec<ParamKind>,
        handler: impl Fn(&[ParamValue]) -> Response + Send + Sync + 'static,
    ) -> Self {
        Self { params, handler: Box::new(handler) }
    }
}

/// The (up to) four verb bindings declared for a resource. An absent
/// entry means the verb is undeclared and yields `405`.
#[derive(Default)]
pub struct MethodTable {
    pub get: Option<MethodBinding>,
    pub put: Option<MethodBinding>,
    pub post: Option<MethodBinding>,
    pub delete: Option<MethodBinding>,
}

impl MethodTable {
    pub fn binding(&self, method: HttpMethod) -> Option<&MethodBinding> {
        match method {
            HttpMethod::Get => self.get.as_ref(),
            HttpMethod::Put => self.put.as_ref(),
            HttpMethod::Post => self.post.as_ref(),
            HttpMethod::Delete => self.delete.as_ref(),
        }
    }
}

/// A user-registered handler bound to exactly one path template.
pub struct Resource {
    pub template: String,
    pub methods: MethodTable,
}

/// Builds a [`Resource`] by declaring method bindings one at a time,
/// mirroring the source's "bind all four verbs, default to not-allowed"
/// shape but only materialising the verbs actually declared.
pub struct ResourceBuilder {
    template: String,
    methods: MethodTable,
}

impl ResourceBuilder {
    pub fn new(template: impl Into<String>) -> Self {
        Self { template: template.into(), methods: MethodTable::default() }
    }

    pub fn get(
        mut self,
        params: Vec<ParamKind>,
        handler: impl Fn(&[ParamValue]) -> Response + Send + Sync + 'static,
    ) -> Self {
        self.methods.get = Some(MethodBinding::new(params, handler));
        self
    }

    pub fn put(
        mut self,
        params: Vec<ParamKind>,
        handler: impl Fn(&[ParamValue]) -> Response + Send + Sync + 'static,
    ) -> Self {
        self.methods.put = Some(MethodBinding::new(params, handler));
        self
    }

    pub fn post(
        mut self,
        params: Vec<ParamKind>,
        handler: impl Fn(&[ParamValue]) -> Response + Send + Sync + 'static,
    ) -> Self {
        self.methods.post = Some(MethodBinding::new(params, handler));
        self
    }

    pub fn delete(
        mut self,
        params: Vec<ParamKind>,
        handler: impl Fn(&[ParamValue]) -> Response + Send + Sync + 'static,
    ) -> Self {
        self.methods.delete = Some(MethodBinding::new(params, handler));
        self
    }

    pub fn build(self) -> Resource {
        Resource { template: self.template, methods: self.methods }
    }
}

/// Holds the insertion-ordered list of registered resources, for
/// enumeration and startup logging. Path indexing itself is delegated to
/// the matcher; resources are identified by identity (pointer equality on
/// the `Arc`), never by path string.
#[derive(Default)]
pub struct ResourceRegistry {
    resources: Vec<Arc<Resource>>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, resource: Arc<Resource>) {
        self.resources.push(resource);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Resource>> {
        self.resources.iter()
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}
