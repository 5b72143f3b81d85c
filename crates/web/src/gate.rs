//! Server-side data gate for authenticated pages.
//!
//! A gated page fetches its initial data from the REST API on behalf of the
//! signed-in visitor. Visitors without a session are sent to `/`; fetch
//! failures are recovered into an empty result so the page still renders.

use serde::de::DeserializeOwned;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::models::AuthSession;
use crate::rest::{ApiClient, ApiRequest};

/// Where unauthenticated visitors are sent.
pub const SIGNED_OUT_DESTINATION: &str = "/";

/// Redirect outcome of the gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageRedirect {
    pub destination: String,
    pub permanent: bool,
}

impl PageRedirect {
    /// Temporary redirect to the landing page.
    #[must_use]
    pub fn signed_out() -> Self {
        Self {
            destination: SIGNED_OUT_DESTINATION.to_string(),
            permanent: false,
        }
    }
}

/// Data handed to a gated page under `key`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageProps<T> {
    pub key: String,
    pub data: T,
    /// Why the fetch failed, when `data` is the empty fallback.
    pub recovered: Option<String>,
}

impl<T> PageProps<T> {
    #[must_use]
    pub const fn is_recovered(&self) -> bool {
        self.recovered.is_some()
    }
}

/// Result of loading a gated page's initial data.
///
/// Serializes as `{"redirect": {...}}` or `{"props": {<key>: <data>}}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitialProps<T> {
    Redirect(PageRedirect),
    Props(PageProps<T>),
}

impl<T> InitialProps<T> {
    /// Transform the data while keeping the outcome.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> InitialProps<U> {
        match self {
            Self::Redirect(redirect) => InitialProps::Redirect(redirect),
            Self::Props(props) => InitialProps::Props(PageProps {
                key: props.key,
                data: f(props.data),
                recovered: props.recovered,
            }),
        }
    }
}

impl<T: Serialize> Serialize for InitialProps<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        struct Keyed<'a, T> {
            key: &'a str,
            data: &'a T,
        }

        impl<T: Serialize> Serialize for Keyed<'_, T> {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(self.key, self.data)?;
                map.end()
            }
        }

        let mut map = serializer.serialize_map(Some(1))?;
        match self {
            Self::Redirect(redirect) => map.serialize_entry("redirect", redirect)?,
            Self::Props(props) => map.serialize_entry(
                "props",
                &Keyed {
                    key: &props.key,
                    data: &props.data,
                },
            )?,
        }
        map.end()
    }
}

/// Load a gated page's initial data.
///
/// Without a session the result is a redirect to `/`. Otherwise
/// `resource_path` is fetched with the visitor's session cookie forwarded;
/// any failure is logged and replaced by `T::default()`.
pub async fn load_initial_props<T>(
    api: &ApiClient,
    session: Option<&AuthSession>,
    resource_path: &str,
    result_key: &str,
) -> InitialProps<T>
where
    T: DeserializeOwned + Default,
{
    let Some(session) = session else {
        return InitialProps::Redirect(PageRedirect::signed_out());
    };

    let request = ApiRequest::get(resource_path).with_credential(&session.credential);

    let (data, recovered) = match api.call::<T>(request).await {
        Ok(data) => (data, None),
        Err(e) => {
            tracing::error!(
                resource = %resource_path,
                result_key = %result_key,
                user_id = %session.user_id(),
                error = %e,
                "Failed to load initial page data"
            );
            (T::default(), Some(e.to_string()))
        }
    };

    InitialProps::Props(PageProps {
        key: result_key.to_string(),
        data,
        recovered,
    })
}
