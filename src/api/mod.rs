//
//  releasehub-cli
//  api/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/16.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # API Client Layer
//!
//! This module provides the HTTP plumbing and the per-entity resource
//! clients for the ReleaseHub REST API.
//!
//! ## Architecture
//!
//! - [`http`]: Core HTTP client with envelope unwrapping, bearer-token
//!   injection, and centralized error classification
//! - [`common`]: Shared pagination types (page queries, page results, server
//!   paged wire shape)
//! - One module per entity: [`auth`], [`iterations`], [`release_windows`],
//!   [`repositories`], [`runs`], [`branch_rules`], [`version_policies`]
//!
//! ## Rules of the Layer
//!
//! - The [`http::ApiClient`] is the single choke point for backend calls;
//!   no other module issues raw network requests.
//! - Resource clients translate domain operations into client calls and
//!   adapt request/response shapes where the backend is inconsistent.
//! - [`http::ApiError`] is produced exactly once per failed call, at the
//!   client boundary. Resource clients propagate it with `?` and never
//!   construct errors of their own.

pub mod http;

pub mod common;

pub mod auth;
pub mod branch_rules;
pub mod iterations;
pub mod release_windows;
pub mod repositories;
pub mod runs;
pub mod version_policies;

pub use common::{PageQuery, PageResult, PaginationMode};
pub use http::{ApiClient, ApiError, ApiResponse};
