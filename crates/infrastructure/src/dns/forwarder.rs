use super::forwarding::{describe_answers, describe_questions, MessageBuilder};
use super::transport::DnsTransport;
use async_trait::async_trait;
use dns_feed_application::BroadcastHub;
use dns_feed_domain::config::ResolutionOverflow;
use dns_feed_domain::{DomainError, ResolutionEvent};
use hickory_proto::op::Message;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, warn};

/// Sends a reply back to whoever asked the query.
#[async_trait]
pub trait ReplyWriter: Send + Sync {
    async fn write_reply(&self, reply: &[u8]) -> Result<(), DomainError>;
}

/// Forwards one inbound query upstream, replies to the asker and feeds the
/// outcome to the broadcast hub.
///
/// Each query is resolved exactly once; retries are left to the asker. A
/// failed exchange produces a SERVFAIL reply and no event.
pub struct QueryForwarder {
    transport: Arc<dyn DnsTransport>,
    upstream: Arc<str>,
    timeout: Duration,
    hub: BroadcastHub,
    overflow: ResolutionOverflow,
}

impl QueryForwarder {
    pub fn new(
        transport: Arc<dyn DnsTransport>,
        timeout: Duration,
        hub: BroadcastHub,
        overflow: ResolutionOverflow,
    ) -> Self {
        let upstream = Arc::from(transport.upstream());
        Self {
            transport,
            upstream,
            timeout,
            hub,
            overflow,
        }
    }

    pub fn upstream(&self) -> &str {
        &self.upstream
    }

    pub async fn handle(&self, query: &[u8], writer: &dyn ReplyWriter) {
        let request = match Message::from_vec(query) {
            Ok(request) => request,
            Err(e) => {
                debug!(error = %e, bytes = query.len(), "Dropping unparsable DNS query");
                return;
            }
        };

        match self.resolve(query, &request).await {
            Ok((reply, event)) => {
                self.write(writer, &reply).await;
                self.emit(event).await;
            }
            Err(e) => {
                if matches!(e, DomainError::TransportTimeout(_)) {
                    warn!(upstream = %self.upstream, id = request.id(), "Upstream exchange timed out");
                } else {
                    warn!(upstream = %self.upstream, id = request.id(), error = %e, "Upstream exchange failed");
                }

                match MessageBuilder::servfail(&request) {
                    Ok(reply) => self.write(writer, &reply).await,
                    Err(e) => error!(error = %e, "Failed to build SERVFAIL reply"),
                }
            }
        }
    }

    async fn resolve(
        &self,
        query: &[u8],
        request: &Message,
    ) -> Result<(Vec<u8>, ResolutionEvent), DomainError> {
        let response = self.transport.send(query, self.timeout).await?;

        let upstream_message = Message::from_vec(&response.bytes).map_err(|e| {
            DomainError::InvalidDnsMessage(format!("Failed to parse upstream response: {}", e))
        })?;

        let event = ResolutionEvent::new(
            Arc::clone(&self.upstream),
            response.rtt,
            describe_questions(request),
            describe_answers(&upstream_message),
        );

        debug!(
            upstream = %self.upstream,
            id = request.id(),
            rtt_ms = response.rtt.as_millis() as u64,
            answers = event.answers().len(),
            "Query forwarded"
        );

        let reply = MessageBuilder::rekey(response.bytes, request.id())?;
        Ok((reply, event))
    }

    async fn write(&self, writer: &dyn ReplyWriter, reply: &[u8]) {
        if let Err(e) = writer.write_reply(reply).await {
            warn!(error = %e, "Failed to send DNS reply");
        }
    }

    async fn emit(&self, event: ResolutionEvent) {
        let result = match self.overflow {
            ResolutionOverflow::Drop => self.hub.try_publish(event),
            ResolutionOverflow::Wait => self.hub.publish(event).await,
        };

        if let Err(e) = result {
            debug!(error = %e, "Resolution event not published");
        }
    }
}
