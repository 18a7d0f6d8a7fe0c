use std::collections::HashMap;
use std::str::FromStr;

use once_cell::unsync::Lazy;
use regex_lite::Regex;

use crate::error::MalformedNetwork;

/// Interned handle for a valve. Cheap to copy and hash, so it can sit in
/// bitmask orderings and cache keys without dragging the name along.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct ValveId(pub(crate) u8);

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Tunnel {
    pub to: ValveId,
    pub cost: u32,
}

/// The valve network: per-valve flow rate and outgoing tunnels, plus
/// name<->handle maps for diagnostics. Pure data; compaction and search
/// live elsewhere.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct Volcano {
    pub(crate) flow_for: HashMap<ValveId, usize>,
    pub(crate) tunnels_for: HashMap<ValveId, Vec<Tunnel>>,
    pub(crate) name_for: HashMap<ValveId, String>,
    pub(crate) handle_for: HashMap<String, ValveId>,
}

impl Volcano {
    pub fn new() -> Self {
        Self::default()
    }

    fn intern(&mut self, name: &str) -> ValveId {
        match self.handle_for.get(name) {
            Some(&id) => id,
            None => {
                let id = ValveId(self.handle_for.len() as u8);
                self.handle_for.insert(name.to_string(), id);
                self.name_for.insert(id, name.to_string());
                id
            }
        }
    }

    /// Adds a valve (or updates its flow rate if the name was already seen
    /// as a tunnel target) and returns its handle.
    pub fn add_valve(&mut self, name: &str, flow: usize) -> ValveId {
        let id = self.intern(name);
        self.flow_for.insert(id, flow);
        self.tunnels_for.entry(id).or_default();
        id
    }

    pub fn add_tunnel(&mut self, from: ValveId, to: ValveId, cost: u32) {
        self.tunnels_for.entry(from).or_default().push(Tunnel { to, cost });
    }

    /// Adds tunnels in both directions, which is how the domain's input is
    /// shaped. Nothing downstream relies on symmetry, though.
    pub fn link(&mut self, a: ValveId, b: ValveId, cost: u32) {
        self.add_tunnel(a, b, cost);
        self.add_tunnel(b, a, cost);
    }

    pub fn handle(&self, name: &str) -> Option<ValveId> {
        self.handle_for.get(name).copied()
    }

    pub fn contains(&self, id: ValveId) -> bool {
        self.flow_for.contains_key(&id)
    }

    pub fn flow(&self, id: ValveId) -> usize {
        self.flow_for.get(&id).copied().unwrap_or(0)
    }

    pub fn tunnels(&self, id: ValveId) -> &[Tunnel] {
        self.tunnels_for.get(&id).map_or(&[], Vec::as_slice)
    }

    pub fn valves(&self) -> impl Iterator<Item = ValveId> + '_ {
        self.flow_for.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.flow_for.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flow_for.is_empty()
    }

    /// Display name for error messages; falls back to the raw handle for
    /// valves that were never named.
    pub(crate) fn label(&self, id: ValveId) -> String {
        match self.name_for.get(&id) {
            Some(name) => name.clone(),
            None => format!("valve #{}", id.0),
        }
    }
}

impl FromStr for Volcano {
    type Err = MalformedNetwork;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // eg: Valve AA has flow rate=0; tunnels lead to valves DD, II, BB
        let line_re = Lazy::new(|| {
            Regex::new(r#"Valve ([A-Z]{2}) has flow rate=(\d+); tunnel(?:s)? lead(?:s)? to valve(?:s)? (.*)"#).unwrap()
        });
        let mut volcano = Volcano::new();
        for line in s.lines() {
            let Some(caps) = line_re.captures(line) else {
                return Err(MalformedNetwork::BadLine(line.to_string()));
            };
            let flow: usize = caps[2]
                .parse()
                .map_err(|_| MalformedNetwork::BadLine(line.to_string()))?;
            let src = volcano.add_valve(&caps[1], flow);
            for name in caps[3].split(", ") {
                let dst = volcano.intern(name);
                // All tunnels in the raw input take one minute to walk.
                volcano.add_tunnel(src, dst, 1);
            }
        }
        Ok(volcano)
    }
}
