use anyhow::Context;
use dns_feed_application::BroadcastHub;
use dns_feed_domain::Config;
use dns_feed_infrastructure::dns::{DnsListener, DnsTransport, QueryForwarder, UdpTransport};
use std::sync::Arc;
use tracing::info;

pub async fn bind_dns_listener(config: &Config, hub: BroadcastHub) -> anyhow::Result<DnsListener> {
    let upstream = config.upstream_addr()?;
    let transport: Arc<dyn DnsTransport> =
        Arc::new(UdpTransport::new(upstream, config.dns.udp_payload_size));
    let forwarder = Arc::new(QueryForwarder::new(
        transport,
        config.dns.query_timeout(),
        hub,
        config.hub.resolution_overflow,
    ));

    let addr = config.server.dns_addr()?;
    let listener = DnsListener::bind(addr, forwarder, config.dns.udp_payload_size)
        .await
        .with_context(|| format!("failed to bind DNS listener on {}", addr))?;

    info!(
        bind_address = %addr,
        protocol = "UDP",
        upstream = %upstream,
        timeout_ms = config.dns.query_timeout,
        "DNS listener bound"
    );
    Ok(listener)
}
