use std::collections::HashSet;

use crate::error::MalformedNetwork;
use crate::graph::{Tunnel, ValveId, Volcano};

/// Folds every zero-flow valve except `start` out of the network, joining
/// its neighbors with direct tunnels whose cost is the sum of the walks
/// through it. The result keeps `start` plus exactly the valves worth
/// opening, with tunnel lists normalized (sorted by target, one minimum-cost
/// entry per target) so compacting a compacted network is a no-op.
pub fn compact(volcano: &Volcano, start: ValveId) -> Result<Volcano, MalformedNetwork> {
    validate(volcano, start)?;

    let mut out = volcano.clone();

    // Eliminate in handle order so the result is deterministic. Each
    // elimination folds tunnels among whatever valves are still live, so a
    // single pass over the original zero-flow set is enough.
    let mut doomed: Vec<ValveId> = out
        .flow_for
        .iter()
        .filter(|&(&id, &flow)| flow == 0 && id != start)
        .map(|(&id, _)| id)
        .collect();
    doomed.sort();

    for v in doomed {
        let through = out.tunnels_for.remove(&v).unwrap_or_default();
        // Incoming tunnels are found by scanning, not by mirroring the
        // outgoing list, so asymmetric input still folds correctly.
        for tunnels in out.tunnels_for.values_mut() {
            let incoming: Vec<Tunnel> = tunnels.iter().filter(|t| t.to == v).copied().collect();
            if incoming.is_empty() {
                continue;
            }
            tunnels.retain(|t| t.to != v);
            for walk_in in &incoming {
                for walk_out in &through {
                    if walk_out.to == v {
                        continue;
                    }
                    push_min_tunnel(tunnels, walk_out.to, walk_in.cost + walk_out.cost);
                }
            }
        }
        out.flow_for.remove(&v);
        if let Some(name) = out.name_for.remove(&v) {
            out.handle_for.remove(&name);
        }
    }

    // Drop tunnels that folded back onto their own valve, collapse
    // duplicates to the cheapest, and fix an order for equality checks.
    for (&id, tunnels) in out.tunnels_for.iter_mut() {
        let mut merged: Vec<Tunnel> = Vec::with_capacity(tunnels.len());
        for t in tunnels.iter().filter(|t| t.to != id) {
            push_min_tunnel(&mut merged, t.to, t.cost);
        }
        merged.sort_by_key(|t| t.to);
        *tunnels = merged;
    }

    check_reachable(&out, start)?;
    Ok(out)
}

/// Adds `to` at `cost`, or lowers the existing entry if this route is
/// cheaper. Multiple folded routes between the same pair keep the minimum.
fn push_min_tunnel(tunnels: &mut Vec<Tunnel>, to: ValveId, cost: u32) {
    match tunnels.iter_mut().find(|t| t.to == to) {
        Some(t) => t.cost = t.cost.min(cost),
        None => tunnels.push(Tunnel { to, cost }),
    }
}

fn validate(volcano: &Volcano, start: ValveId) -> Result<(), MalformedNetwork> {
    if !volcano.contains(start) {
        return Err(MalformedNetwork::MissingStart(volcano.label(start)));
    }
    for (&from, tunnels) in &volcano.tunnels_for {
        for t in tunnels {
            if !volcano.contains(from) || !volcano.contains(t.to) {
                return Err(MalformedNetwork::DanglingTunnel {
                    from: volcano.label(from),
                    to: volcano.label(t.to),
                });
            }
            // A free tunnel would let the search walk forever without
            // spending time.
            if t.cost == 0 {
                return Err(MalformedNetwork::ZeroCostTunnel {
                    from: volcano.label(from),
                    to: volcano.label(t.to),
                });
            }
        }
    }
    Ok(())
}

/// Compaction must not strand the working valves: if any valve with positive
/// flow survives, at least one has to be reachable from `start`.
fn check_reachable(volcano: &Volcano, start: ValveId) -> Result<(), MalformedNetwork> {
    let mut seen: HashSet<ValveId> = HashSet::from([start]);
    let mut stack = vec![start];
    while let Some(id) = stack.pop() {
        for t in volcano.tunnels(id) {
            if seen.insert(t.to) {
                stack.push(t.to);
            }
        }
    }
    let has_working = volcano.valves().any(|id| id != start && volcano.flow(id) > 0);
    let reaches_working = seen.iter().any(|&id| id != start && volcano.flow(id) > 0);
    if has_working && !reaches_working {
        return Err(MalformedNetwork::NoReachableValves(volcano.label(start)));
    }
    Ok(())
}
