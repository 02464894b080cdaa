// ----------------------------------------------------------------------------
// This source code contains derived artifacts from seanmonstar's `reqwest`.
// for further information(including license information),
// please visit their repository: https://github.com/seanmonstar/reqwest .
// ----------------------------------------------------------------------------
use std::{borrow::Cow, convert::TryFrom, future::Future, time::Duration};

use http::{header::AUTHORIZATION, Method};
use reqwest::{
    header::HeaderMap, header::HeaderName, header::HeaderValue, Body, Error,
    RequestBuilder as ReqwestRequestBuilder, Response, Url,
};
use serde::Serialize;

use crate::credentials::Credentials;
use crate::signer::Signer;
use crate::OAUTH_KEY_PREFIX;

/// Wraps `reqwest::RequestBuilder`, capturing the query string and form body
/// so they can be folded into the OAuth signature before dispatch.
pub struct RequestBuilder<TSigner>
where
    TSigner: Clone,
{
    method: Method,
    inner: ReqwestRequestBuilder,
    signer: TSigner,
    url: Option<Url>,
    body: String,
}

impl RequestBuilder<()> {
    /// Add the signing information.
    pub fn sign<'a>(self, credentials: &'a Credentials) -> RequestBuilder<Signer<'a>> {
        RequestBuilder {
            inner: self.inner,
            method: self.method,
            url: self.url,
            body: self.body,
            signer: Signer::new(credentials),
        }
    }
}

impl<'a> RequestBuilder<Signer<'a>> {
    /// Constructs the Request and sends it to the target URL, returning a
    /// future Response.
    ///
    /// # Errors
    ///
    /// This method fails if there was an error while sending request,
    /// redirect loop was detected or redirect limit was exhausted.
    pub fn send(self) -> impl Future<Output = Result<Response, Error>> {
        self.generate_signature().send()
    }

    /// Generate an OAuth `Authorization` header over the captured query and
    /// form parameters and return the reqwest's `RequestBuilder`.
    pub fn generate_signature(self) -> ReqwestRequestBuilder {
        if let Some(url) = self.url {
            let query = url.query().unwrap_or("").to_string();
            let mut base_url = url;
            base_url.set_query(None);

            // oauth_* protocol parameters come from the signer, never from
            // the captured payload
            let pairs: Vec<(String, String)> = url::form_urlencoded::parse(query.as_bytes())
                .into_owned()
                .chain(url::form_urlencoded::parse(self.body.as_bytes()).into_owned())
                .filter(|(key, _)| !key.starts_with(OAUTH_KEY_PREFIX))
                .collect();
            let parameters: Vec<(Cow<'_, str>, Cow<'_, str>)> = pairs
                .iter()
                .map(|(key, value)| (Cow::from(key.as_str()), Cow::from(value.as_str())))
                .collect();

            let header = self
                .signer
                .generate_oauth_header(&self.method, &base_url, &parameters);
            self.inner.header(AUTHORIZATION, header)
        } else {
            // just return inner RequestBuilder
            self.inner
        }
    }
}

impl<TSigner> RequestBuilder<TSigner>
where
    TSigner: Clone,
{
    pub(crate) fn new(
        builder: ReqwestRequestBuilder,
        method: Method,
        url: Option<Url>,
        signer: TSigner,
    ) -> Self {
        RequestBuilder {
            inner: builder,
            method,
            url,
            body: String::new(),
            signer,
        }
    }

    /// Modify the query string of the URL.
    ///
    /// Modifies the URL of this request, adding the parameters provided.
    /// This method appends and does not overwrite. This means that it can
    /// be called multiple times and that existing query parameters are not
    /// overwritten if the same key is used. The key will simply show up
    /// twice in the query string.
    /// Calling `.query([("foo", "a"), ("foo", "b")])` gives `"foo=a&foo=b"`.
    ///
    /// # Note
    /// This method does not support serializing a single key-value
    /// pair. Instead of using `.query(("key", "val"))`, use a sequence, such
    /// as `.query(&[("key", "val")])`. It's also possible to serialize structs
    /// and maps into a key-value pair.
    pub fn query<T: Serialize + ?Sized>(mut self, query: &T) -> Self {
        // update local-captured url
        if let Some(ref mut url) = self.url {
            let mut pairs = url.query_pairs_mut();
            let serializer = serde_urlencoded::Serializer::new(&mut pairs);

            let _ = query.serialize(serializer);
        }
        // cleanup
        if let Some(ref mut url) = self.url {
            if let Some("") = url.query() {
                url.set_query(None);
            }
        }
        // passing argument into original request builder
        self.inner = self.inner.query(query);
        self
    }

    /// Send a form body.
    pub fn form<T: Serialize + ?Sized + Clone>(mut self, form: &T) -> Self {
        match serde_urlencoded::to_string(form.clone()) {
            Ok(body) => {
                self.inner = self.inner.form(form);
                self.body = body;
                self
            }
            Err(_) => self.pass_through(|b| b.form(form)),
        }
    }

    fn pass_through<F>(self, f: F) -> Self
    where
        F: FnOnce(ReqwestRequestBuilder) -> ReqwestRequestBuilder,
    {
        RequestBuilder {
            inner: f(self.inner),
            ..self
        }
    }

    /// Add a `Header` to this Request.
    pub fn header<K, V>(self, key: K, value: V) -> Self
    where
        HeaderName: TryFrom<K>,
        <HeaderName as TryFrom<K>>::Error: Into<http::Error>,
        HeaderValue: TryFrom<V>,
        <HeaderValue as TryFrom<V>>::Error: Into<http::Error>,
    {
        self.pass_through(|b| b.header(key, value))
    }

    /// Add a set of Headers to the existing ones on this Request.
    ///
    /// The headers will be merged in to any already set.
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.inner = self.inner.headers(headers);
        self
    }

    /// Set the request body.
    ///
    /// Note: a raw body is not captured for signing; use [`form`](Self::form)
    /// for parameters that must participate in the signature.
    pub fn body<T: Into<Body>>(mut self, body: T) -> Self {
        self.inner = self.inner.body(body);
        self
    }

    /// Enables a request timeout.
    ///
    /// The timeout is applied from the when the request starts connecting
    /// until the response body has finished. It affects only this request
    /// and overrides the timeout configured using `ClientBuilder::timeout()`.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.inner = self.inner.timeout(timeout);
        self
    }

    /// Attempt to clone the RequestBuilder.
    ///
    /// `None` is returned if the RequestBuilder can not be cloned,
    /// i.e. if the request body is a stream.
    pub fn try_clone(&self) -> Option<Self> {
        self.inner.try_clone().map(|inner| RequestBuilder {
            inner,
            method: self.method.clone(),
            url: self.url.clone(),
            body: self.body.clone(),
            signer: self.signer.clone(),
        })
    }
}
