use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use http_body_util::Empty;
use hyper::body::Bytes;
use hyper::header::{HOST, LOCATION, USER_AGENT};
use hyper::{Method, Request, StatusCode};
use hyper_util::rt::TokioIo;
use rustls::pki_types::ServerName;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio::runtime::{Builder, Runtime};
use tokio_rustls::TlsConnector;

use super::{ProbeError, SiteProbe, client_config};
use crate::domain::TestSite;

/// Redirect hops followed before giving up.
const MAX_REDIRECTS: usize = 10;

/// Blocking probe backed by a private current-thread runtime.
pub struct HttpsSiteProbe {
    runtime: Runtime,
    connector: TlsConnector,
    timeout: Duration,
}

impl HttpsSiteProbe {
    pub fn new(timeout: Duration, insecure_tls: bool) -> Result<Self, ProbeError> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(ProbeError::Runtime)?;

        let connector = TlsConnector::from(Arc::new(client_config(insecure_tls)?));

        Ok(Self {
            runtime,
            connector,
            timeout,
        })
    }

    /// GET the site, following redirects the way a browser would. Each hop
    /// opens a fresh connection; hops to another host are resolved again.
    async fn get_following(
        &self,
        site: &TestSite,
        addrs: &[IpAddr],
    ) -> Result<StatusCode, ProbeError> {
        let mut site = site.clone();
        let mut addrs = addrs.to_vec();

        for _ in 0..=MAX_REDIRECTS {
            let (status, location) = self.get(&site, &addrs).await?;
            let Some(location) = location.filter(|_| is_followed_redirect(status)) else {
                return Ok(status);
            };

            let next = site
                .follow(&location)
                .map_err(|_| ProbeError::InvalidRedirect(location.clone()))?;
            tracing::debug!(
                from = %site,
                to = %next,
                status = status.as_u16(),
                "Following redirect"
            );

            if next.host() != site.host() {
                addrs = lookup(&next).await?;
            }
            site = next;
        }

        Err(ProbeError::TooManyRedirects(MAX_REDIRECTS))
    }

    async fn get(
        &self,
        site: &TestSite,
        addrs: &[IpAddr],
    ) -> Result<(StatusCode, Option<String>), ProbeError> {
        let targets: Vec<SocketAddr> = addrs
            .iter()
            .map(|ip| SocketAddr::new(*ip, site.port()))
            .collect();

        let tcp = TcpStream::connect(&targets[..])
            .await
            .map_err(ProbeError::Connect)?;

        let request = Request::builder()
            .method(Method::GET)
            .uri(site.path())
            .header(HOST, site.host_header())
            .header(USER_AGENT, concat!("dns-switch/", env!("CARGO_PKG_VERSION")))
            .body(Empty::<Bytes>::new())?;

        if !site.is_https() {
            return send(TokioIo::new(tcp), request).await;
        }

        let server_name = ServerName::try_from(site.host())
            .map_err(|_| ProbeError::InvalidServerName(site.host().to_string()))?
            .to_owned();

        let tls = self
            .connector
            .connect(server_name, tcp)
            .await
            .map_err(ProbeError::Tls)?;

        send(TokioIo::new(tls), request).await
    }
}

impl SiteProbe for HttpsSiteProbe {
    fn resolve(&self, site: &TestSite) -> Result<Vec<IpAddr>, ProbeError> {
        self.runtime.block_on(lookup(site))
    }

    fn fetch(&self, site: &TestSite, addrs: &[IpAddr]) -> Result<u16, ProbeError> {
        if addrs.is_empty() {
            return Err(ProbeError::NoAddresses(site.host().to_string()));
        }

        self.runtime.block_on(async {
            match tokio::time::timeout(self.timeout, self.get_following(site, addrs)).await {
                Ok(result) => result.map(|status| status.as_u16()),
                Err(_) => Err(ProbeError::Timeout(self.timeout)),
            }
        })
    }
}

async fn lookup(site: &TestSite) -> Result<Vec<IpAddr>, ProbeError> {
    let addrs: Vec<IpAddr> = tokio::net::lookup_host((site.host(), site.port()))
        .await
        .map_err(|e| ProbeError::Resolve {
            host: site.host().to_string(),
            source: e,
        })?
        .map(|addr| addr.ip())
        .collect();

    if addrs.is_empty() {
        return Err(ProbeError::NoAddresses(site.host().to_string()));
    }
    Ok(addrs)
}

fn is_followed_redirect(status: StatusCode) -> bool {
    matches!(status.as_u16(), 301 | 302 | 303 | 307 | 308)
}

async fn send<S>(
    io: TokioIo<S>,
    request: Request<Empty<Bytes>>,
) -> Result<(StatusCode, Option<String>), ProbeError>
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    let (mut sender, connection) = hyper::client::conn::http1::handshake(io).await?;

    let driver = tokio::spawn(async move {
        if let Err(e) = connection.await {
            tracing::debug!("Probe connection closed: {}", e);
        }
    });

    let response = sender.send_request(request).await;
    driver.abort();

    let response = response?;
    let location = response
        .headers()
        .get(LOCATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    Ok((response.status(), location))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    /// Serve one canned response per accepted connection, in order.
    fn serve(responses: Vec<&'static str>) -> (u16, std::thread::JoinHandle<()>) {
        let listener = std::net::TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).unwrap();
        let port = listener.local_addr().unwrap().port();

        let server = std::thread::spawn(move || {
            use std::io::{Read, Write};

            for response in responses {
                let (mut stream, _) = listener.accept().unwrap();
                let mut buf = [0u8; 1024];
                let _ = stream.read(&mut buf).unwrap();
                stream.write_all(response.as_bytes()).unwrap();
            }
        });

        (port, server)
    }

    #[test]
    fn test_fetch_returns_final_status() {
        let probe = HttpsSiteProbe::new(Duration::from_secs(5), true).unwrap();
        let (port, server) =
            serve(vec!["HTTP/1.1 503 Service Unavailable\r\ncontent-length: 0\r\n\r\n"]);

        let site = TestSite::new(format!("http://localhost:{}/", port)).unwrap();
        let status = probe
            .fetch(&site, &[IpAddr::V4(Ipv4Addr::LOCALHOST)])
            .unwrap();

        assert_eq!(status, 503);
        server.join().unwrap();
    }

    #[test]
    fn test_fetch_follows_redirect_to_final_status() {
        let probe = HttpsSiteProbe::new(Duration::from_secs(5), true).unwrap();
        let (port, server) = serve(vec![
            "HTTP/1.1 301 Moved Permanently\r\nlocation: /missing\r\ncontent-length: 0\r\n\r\n",
            "HTTP/1.1 404 Not Found\r\ncontent-length: 0\r\n\r\n",
        ]);

        let site = TestSite::new(format!("http://localhost:{}/", port)).unwrap();
        let status = probe
            .fetch(&site, &[IpAddr::V4(Ipv4Addr::LOCALHOST)])
            .unwrap();

        assert_eq!(status, 404);
        server.join().unwrap();
    }

    #[test]
    fn test_fetch_redirect_loop_gives_up() {
        let probe = HttpsSiteProbe::new(Duration::from_secs(5), true).unwrap();
        let (port, server) = serve(vec![
            "HTTP/1.1 302 Found\r\nlocation: /\r\ncontent-length: 0\r\n\r\n";
            MAX_REDIRECTS + 1
        ]);

        let site = TestSite::new(format!("http://localhost:{}/", port)).unwrap();
        let result = probe.fetch(&site, &[IpAddr::V4(Ipv4Addr::LOCALHOST)]);

        let error = result.unwrap_err();
        assert!(matches!(error, ProbeError::TooManyRedirects(_)));
        assert!(error.is_url_error());
        server.join().unwrap();
    }

    #[test]
    fn test_fetch_times_out() {
        let probe = HttpsSiteProbe::new(Duration::from_millis(200), true).unwrap();

        // The kernel completes the handshake but nobody ever answers
        let listener = std::net::TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).unwrap();
        let port = listener.local_addr().unwrap().port();

        let site = TestSite::new(format!("http://localhost:{}/", port)).unwrap();
        let result = probe.fetch(&site, &[IpAddr::V4(Ipv4Addr::LOCALHOST)]);

        assert!(matches!(result, Err(ProbeError::Timeout(_))));
        drop(listener);
    }

    #[test]
    fn test_fetch_connection_refused() {
        let probe = HttpsSiteProbe::new(Duration::from_secs(5), true).unwrap();

        // Bind then drop to get a port nothing listens on
        let port = {
            let listener = std::net::TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).unwrap();
            listener.local_addr().unwrap().port()
        };

        let site = TestSite::new(format!("https://localhost:{}/", port)).unwrap();
        let result = probe.fetch(&site, &[IpAddr::V4(Ipv4Addr::LOCALHOST)]);

        let error = result.unwrap_err();
        assert!(error.is_url_error());
    }

    #[test]
    fn test_resolve_localhost() {
        let probe = HttpsSiteProbe::new(Duration::from_secs(5), true).unwrap();
        let site = TestSite::new("https://localhost/").unwrap();
        assert!(!probe.resolve(&site).unwrap().is_empty());
    }
}
