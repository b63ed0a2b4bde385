//! The real Steam client over a local socket: dropped connections must be
//! treated as throttling and retried, not given up on.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tokio::net::TcpListener;

use tradeup_scanner::config::{MarketConfig, RateLimitConfig};
use tradeup_scanner::fetcher::RateLimitedFetcher;
use tradeup_scanner::market::SteamMarketClient;
use tradeup_scanner::pacing::IntervalGate;
use tradeup_scanner::rate_limit::RateLimitHandler;
use tradeup_scanner::storage::PriceCache;

/// Accepts every connection, reads the request head and hangs up without
/// answering. Returns the address and a connection counter.
async fn hangup_server() -> (SocketAddr, Arc<AtomicU32>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let connections = Arc::new(AtomicU32::new(0));
    let counter = connections.clone();

    tokio::spawn(async move {
        while let Ok((mut stream, _)) = listener.accept().await {
            counter.fetch_add(1, Ordering::SeqCst);
            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];
            while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                match stream.read(&mut chunk).await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => buf.extend_from_slice(&chunk[..n]),
                }
            }
            drop(stream);
        }
    });

    (addr, connections)
}

#[tokio::test]
async fn test_dropped_connections_back_off_and_retry() {
    let (addr, connections) = hangup_server().await;

    let client = SteamMarketClient::new(&MarketConfig {
        base_url: format!("http://{addr}/market"),
        request_timeout_secs: 5,
        ..MarketConfig::default()
    })
    .unwrap();
    let limiter = RateLimitHandler::new(&RateLimitConfig {
        base_wait_secs: 0,
        max_wait_secs: 0,
        ..RateLimitConfig::default()
    });
    let mut fetcher = RateLimitedFetcher::new(
        Box::new(client),
        PriceCache::in_memory(),
        IntervalGate::unpaced(),
        limiter,
    )
    .with_policy(3, 0);

    let price = fetcher.fetch_price("AK-47 | Redline (Field-Tested)").await;

    assert_eq!(price, None);
    let stats = fetcher.stats();
    assert_eq!(stats.requests, 3);
    assert_eq!(stats.throttled, 3);
    assert_eq!(stats.failed, 1);
    assert_eq!(connections.load(Ordering::SeqCst), 3);
    assert_eq!(fetcher.rate_limit().state().throttle_count, 3);
}
