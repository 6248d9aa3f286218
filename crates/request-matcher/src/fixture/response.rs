//! Turning a selected fixture into a response.
//!
//! Runs after the dispatcher has released the store lock, so reading a
//! resource from disk never blocks other requests from being matched.

use super::types::{Fixture, ResponseSource};
use crate::error::ResourceError;
use crate::resource::{render_template, FixtureResources, Resource};
use crate::response::ResponseDescriptor;
use bytes::Bytes;
use hyper::header::CONTENT_TYPE;

impl Fixture {
    /// Resolve the fixture's resource (if any) and build its response.
    pub async fn render(
        &self,
        resources: &FixtureResources,
    ) -> Result<ResponseDescriptor, ResourceError> {
        let resource = match self.source.resource_name() {
            Some(name) => Some(resources.resolve_async(name).await?),
            None => None,
        };
        Ok(self.respond_with(resource))
    }

    /// Blocking variant of [`render`](Self::render).
    pub fn render_blocking(
        &self,
        resources: &FixtureResources,
    ) -> Result<ResponseDescriptor, ResourceError> {
        let resource = self
            .source
            .resource_name()
            .map(|name| resources.resolve(name))
            .transpose()?;
        Ok(self.respond_with(resource))
    }

    fn respond_with(&self, resource: Option<Resource>) -> ResponseDescriptor {
        let (mut descriptor, inferred) = match (&self.source, resource) {
            (ResponseSource::Inline(inline), _) => (inline.clone(), None),
            (ResponseSource::Template { values, .. }, Some(resource)) => {
                let text = String::from_utf8_lossy(&resource.bytes);
                let body = Bytes::from(render_template(&text, values));
                (
                    ResponseDescriptor::new(self.status).with_body(body),
                    Some(resource.content_type),
                )
            }
            (_, Some(resource)) => (
                ResponseDescriptor::new(self.status).with_body(resource.bytes),
                Some(resource.content_type),
            ),
            (_, None) => (ResponseDescriptor::new(self.status), None),
        };

        // Explicit fixture headers replace an inline content type
        if self
            .headers
            .iter()
            .any(|(name, _)| name.eq_ignore_ascii_case(CONTENT_TYPE.as_str()))
        {
            descriptor
                .headers
                .retain(|(name, _)| !name.eq_ignore_ascii_case(CONTENT_TYPE.as_str()));
        }
        descriptor.headers.extend(self.headers.iter().cloned());

        match inferred {
            Some(content_type) => descriptor.with_default_content_type(content_type),
            None => descriptor,
        }
    }
}
