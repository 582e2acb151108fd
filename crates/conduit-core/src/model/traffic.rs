//! Traffic selectors and treatments.
//!
//! Both are opaque to path computation; they are carried from the request to
//! the compiled intent unchanged. A treatment without instructions drops the
//! selected traffic.

use std::collections::BTreeSet;
use std::fmt;
use std::net::IpAddr;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::model::net::PortNumber;

/// A single header match.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Criterion {
    InPort { port: PortNumber },
    EthType { eth_type: u16 },
    EthSrc { mac: String },
    EthDst { mac: String },
    VlanId { vlan: u16 },
    IpProto { proto: u8 },
    IpSrc { addr: IpAddr, prefix_len: u8 },
    IpDst { addr: IpAddr, prefix_len: u8 },
    TcpSrc { port: u16 },
    TcpDst { port: u16 },
    UdpSrc { port: u16 },
    UdpDst { port: u16 },
    IcmpType { icmp_type: u8 },
    IcmpCode { icmp_code: u8 },
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InPort { port } => write!(f, "IN_PORT:{port}"),
            Self::EthType { eth_type } => write!(f, "ETH_TYPE:0x{eth_type:04x}"),
            Self::EthSrc { mac } => write!(f, "ETH_SRC:{mac}"),
            Self::EthDst { mac } => write!(f, "ETH_DST:{mac}"),
            Self::VlanId { vlan } => write!(f, "VLAN_VID:{vlan}"),
            Self::IpProto { proto } => write!(f, "IP_PROTO:{proto}"),
            Self::IpSrc { addr, prefix_len } => write!(f, "IP_SRC:{addr}/{prefix_len}"),
            Self::IpDst { addr, prefix_len } => write!(f, "IP_DST:{addr}/{prefix_len}"),
            Self::TcpSrc { port } => write!(f, "TCP_SRC:{port}"),
            Self::TcpDst { port } => write!(f, "TCP_DST:{port}"),
            Self::UdpSrc { port } => write!(f, "UDP_SRC:{port}"),
            Self::UdpDst { port } => write!(f, "UDP_DST:{port}"),
            Self::IcmpType { icmp_type } => write!(f, "ICMP_TYPE:{icmp_type}"),
            Self::IcmpCode { icmp_code } => write!(f, "ICMP_CODE:{icmp_code}"),
        }
    }
}

/// Set of header matches. Empty matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrafficSelector {
    criteria: BTreeSet<Criterion>,
}

impl TrafficSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a criterion. A criterion of the same kind is replaced.
    pub fn matching(mut self, criterion: Criterion) -> Self {
        let kind = std::mem::discriminant(&criterion);
        self.criteria.retain(|c| std::mem::discriminant(c) != kind);
        self.criteria.insert(criterion);
        self
    }

    pub fn criteria(&self) -> impl Iterator<Item = &Criterion> {
        self.criteria.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }
}

impl fmt::Display for TrafficSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.criteria.iter().join(", "))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Instruction {
    Output { port: PortNumber },
    SetVlan { vlan: u16 },
    PopVlan,
    SetEthSrc { mac: String },
    SetEthDst { mac: String },
    SetQueue { queue: u32 },
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Output { port } => write!(f, "OUTPUT:{port}"),
            Self::SetVlan { vlan } => write!(f, "VLAN_ID:{vlan}"),
            Self::PopVlan => f.write_str("VLAN_POP"),
            Self::SetEthSrc { mac } => write!(f, "ETH_SRC:{mac}"),
            Self::SetEthDst { mac } => write!(f, "ETH_DST:{mac}"),
            Self::SetQueue { queue } => write!(f, "QUEUE:{queue}"),
        }
    }
}

/// Ordered list of actions applied to selected traffic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrafficTreatment {
    instructions: Vec<Instruction>,
}

impl TrafficTreatment {
    /// The empty treatment: selected traffic is dropped.
    pub fn drop_all() -> Self {
        Self::default()
    }

    pub fn then(mut self, instruction: Instruction) -> Self {
        self.instructions.push(instruction);
        self
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn is_drop(&self) -> bool {
        self.instructions.is_empty()
    }
}

impl fmt::Display for TrafficTreatment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_drop() {
            return f.write_str("[DROP]");
        }
        write!(f, "[{}]", self.instructions.iter().join(", "))
    }
}
