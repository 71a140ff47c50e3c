//! DNS Message Builder
//!
//! Builds the replies the forwarder sends back to the asker using
//! `hickory-proto`.

use dns_feed_domain::DomainError;
use hickory_proto::op::{Message, MessageType, ResponseCode};
use hickory_proto::serialize::binary::{BinEncodable, BinEncoder};

pub struct MessageBuilder;

impl MessageBuilder {
    /// Synthesizes a SERVFAIL reply for `request`.
    ///
    /// The reply keeps the request's id, opcode and RD bit, echoes its first
    /// question and sets the authoritative flag.
    pub fn servfail(request: &Message) -> Result<Vec<u8>, DomainError> {
        let mut reply = Message::new(request.id(), MessageType::Response, request.op_code());
        reply.set_authoritative(true);
        reply.set_recursion_desired(request.recursion_desired());
        reply.set_response_code(ResponseCode::ServFail);
        if let Some(query) = request.queries().first() {
            reply.add_query(query.clone());
        }

        Self::serialize_message(&reply)
    }

    /// Re-keys an upstream response to the asker's transaction id.
    ///
    /// The remaining bytes are relayed untouched.
    pub fn rekey(mut response: Vec<u8>, id: u16) -> Result<Vec<u8>, DomainError> {
        if response.len() < 2 {
            return Err(DomainError::InvalidDnsMessage(
                "response shorter than a transaction id".to_string(),
            ));
        }
        response[..2].copy_from_slice(&id.to_be_bytes());
        Ok(response)
    }

    fn serialize_message(message: &Message) -> Result<Vec<u8>, DomainError> {
        let mut buf = Vec::with_capacity(512);
        let mut encoder = BinEncoder::new(&mut buf);

        message.emit(&mut encoder).map_err(|e| {
            DomainError::InvalidDnsMessage(format!("Failed to serialize DNS message: {}", e))
        })?;

        Ok(buf)
    }
}
