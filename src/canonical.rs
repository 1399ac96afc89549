use super::error::{Result, SignerError};
use url::Url;

/// Name of the query parameter carrying the signature.
pub const SIGNATURE_PARAM: &str = "signature";

/// One `key[=value]` segment of a query string, kept exactly as written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct QueryPair<'a> {
    pub key: &'a str,
    pub value: Option<&'a str>,
}

impl<'a> QueryPair<'a> {
    fn parse(segment: &'a str) -> Self {
        match segment.split_once('=') {
            Some((key, value)) => Self {
                key,
                value: Some(value),
            },
            None => Self {
                key: segment,
                value: None,
            },
        }
    }

    fn is_signature(&self) -> bool {
        self.key == SIGNATURE_PARAM
    }

    fn push_to(&self, out: &mut String) {
        out.push_str(self.key);
        if let Some(value) = self.value {
            out.push('=');
            out.push_str(value);
        }
    }
}

/// A URL split into the parts that take part in signing.
///
/// Every part is a slice of the caller's text. The URL parser only validates
/// the input; its normalized form is never signed, so case, separators and
/// percent-encoding reach the MAC exactly as written.
#[derive(Debug)]
pub(crate) struct ParsedUrl<'a> {
    scheme: &'a str,
    host: &'a str,
    port: Option<&'a str>,
    path: &'a str,
    query: Option<&'a str>,
}

impl<'a> ParsedUrl<'a> {
    /// Parses `input`, insisting on a scheme and a host.
    ///
    /// # Errors
    /// Returns `InvalidUrl` for schemeless input such as `example.com`, for
    /// anything the URL parser rejects, and for URLs without an authority.
    pub fn parse(input: &'a str) -> Result<Self> {
        let Some((scheme, rest)) = input.split_once("://") else {
            return Err(SignerError::InvalidUrl(
                "no scheme. Please use a full URL such as https://host/path.".into(),
            ));
        };
        let url = Url::parse(input)?;
        if url.host_str().is_none() {
            return Err(SignerError::InvalidUrl(format!(
                "URL with scheme '{}' has no host.",
                url.scheme()
            )));
        }

        let rest = rest.split_once('#').map_or(rest, |(before, _)| before);
        let (rest, query) = match rest.split_once('?') {
            Some((before, query)) => (before, Some(query)),
            None => (rest, None),
        };
        let authority_end = rest.find(['/', '\\']).unwrap_or(rest.len());
        let (authority, path) = rest.split_at(authority_end);
        let host_port = authority.rsplit_once('@').map_or(authority, |(_, hp)| hp);
        let (host, port) = split_port(host_port);

        Ok(Self {
            scheme,
            host,
            port,
            path,
            query,
        })
    }

    pub fn scheme(&self) -> &'a str {
        self.scheme
    }

    pub fn host(&self) -> &'a str {
        self.host
    }

    /// Query segments in original order. An absent or empty query has none.
    pub fn query_pairs(&self) -> Vec<QueryPair<'a>> {
        match self.query {
            None | Some("") => Vec::new(),
            Some(query) => query.split('&').map(QueryPair::parse).collect(),
        }
    }

    /// Value of the last `signature` parameter, if any.
    pub fn signature(&self) -> Option<&'a str> {
        self.query_pairs()
            .into_iter()
            .rev()
            .find(QueryPair::is_signature)
            .map(|pair| pair.value.unwrap_or(""))
    }

    /// Builds `scheme://host[:port]path[?query]` without any `signature`
    /// parameter. Ports 80 and 443 are dropped whatever the scheme; nothing
    /// else is rewritten.
    pub fn canonical(&self) -> String {
        let query_len = self.query.map_or(0, str::len);
        let mut out = String::with_capacity(self.host.len() + self.path.len() + query_len + 16);
        out.push_str(self.scheme);
        out.push_str("://");
        out.push_str(self.host);
        if let Some(port) = self.port.filter(|port| !is_default_port(port)) {
            out.push(':');
            out.push_str(port);
        }
        out.push_str(self.path);

        let mut first = true;
        for pair in self.query_pairs().iter().filter(|pair| !pair.is_signature()) {
            out.push(if first { '?' } else { '&' });
            pair.push_to(&mut out);
            first = false;
        }
        out
    }
}

/// Splits `host[:port]`, keeping bracketed IPv6 literals whole. An empty
/// port counts as none.
fn split_port(host_port: &str) -> (&str, Option<&str>) {
    let host_end = if host_port.starts_with('[') {
        host_port.find(']').map_or(host_port.len(), |i| i + 1)
    } else {
        host_port.find(':').unwrap_or(host_port.len())
    };
    let (host, port) = host_port.split_at(host_end);
    match port.strip_prefix(':') {
        Some("") | None => (host, None),
        Some(port) => (host, Some(port)),
    }
}

fn is_default_port(port: &str) -> bool {
    matches!(port.parse::<u16>(), Ok(80 | 443))
}

/// Appends the signature parameter to an already canonical URL.
pub(crate) fn append_signature(canonical: &str, signature: &str) -> String {
    let separator = if canonical.contains('?') { '&' } else { '?' };
    format!("{canonical}{separator}{SIGNATURE_PARAM}={signature}")
}
