//! Dockerfile template.
//!
//! Values are escaped before they reach the template, so it is registered
//! with `no_escape`. Optional instructions sit inside `#if`/`#each` blocks
//! that start mid-line, which keeps Handlebars' standalone-line stripping out
//! of the picture and the output byte-stable.

/// Single-stage Dockerfile built from `scratch`.
pub const DOCKERFILE_TEMPLATE: &str = "FROM scratch
MAINTAINER {{maintainer}}
{{#if workdir}}WORKDIR {{workdir}}
{{/if}}{{#each env}}ENV {{this}}
{{/each}}ENTRYPOINT {{entrypoint}}
{{#if cmd}}CMD {{cmd}}
{{/if}}ADD {{add}}
{{#if expose}}EXPOSE {{expose}}
{{/if}}";
