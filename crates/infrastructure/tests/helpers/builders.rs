use std::net::SocketAddr;

/// Well-known addresses used across the tests
pub struct DnsServerBuilder;

impl DnsServerBuilder {
    /// The default upstream (Cloudflare for Families)
    pub fn default_upstream() -> SocketAddr {
        "1.1.1.3:53".parse().unwrap()
    }

    /// Loopback with an OS-assigned port
    pub fn loopback_any() -> SocketAddr {
        "127.0.0.1:0".parse().unwrap()
    }
}

/// Wire-format `A IN` query for `name` with RD set.
pub fn query_bytes(id: u16, name: &str) -> Vec<u8> {
    let mut query = Vec::with_capacity(64);
    query.extend_from_slice(&id.to_be_bytes());
    query.extend_from_slice(&[
        0x01, 0x00, // Flags: RD
        0x00, 0x01, // Questions: 1
        0x00, 0x00, // Answers: 0
        0x00, 0x00, // Authority: 0
        0x00, 0x00, // Additional: 0
    ]);
    for label in name.trim_end_matches('.').split('.') {
        query.push(label.len() as u8);
        query.extend_from_slice(label.as_bytes());
    }
    query.push(0);
    query.extend_from_slice(&[
        0x00, 0x01, // Type A
        0x00, 0x01, // Class IN
    ]);
    query
}

/// Response to a single-question `query` carrying one A record.
pub fn a_response(query: &[u8], ip: [u8; 4], ttl: u32) -> Vec<u8> {
    let mut response = Vec::with_capacity(query.len() + 16);

    response.extend_from_slice(&query[0..2]); // Transaction ID
    response.push(0x81); // QR=1, Opcode=0, AA=0, TC=0, RD=1
    response.push(0x80); // RA=1, RCODE=0
    response.extend_from_slice(&query[4..6]); // Questions
    response.extend_from_slice(&[0x00, 0x01]); // Answers: 1
    response.extend_from_slice(&[0x00, 0x00]); // Authority: 0
    response.extend_from_slice(&[0x00, 0x00]); // Additional: 0
    response.extend_from_slice(&query[12..]); // Question section

    response.extend_from_slice(&[
        0xc0, 0x0c, // Name pointer to question
        0x00, 0x01, // Type A
        0x00, 0x01, // Class IN
    ]);
    response.extend_from_slice(&ttl.to_be_bytes());
    response.extend_from_slice(&[0x00, 0x04]);
    response.extend_from_slice(&ip);

    response
}
