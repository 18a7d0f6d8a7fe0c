use std::collections::HashMap;

use crate::error::{InvalidBudget, MalformedNetwork};
use crate::graph::{Tunnel, ValveId, Volcano};

/// Memoized search for the most pressure releasable from a compacted
/// network. Holds the fixed valve-to-bit ordering; each call to an entry
/// point gets its own cache, so independent searches never contaminate
/// each other.
#[derive(Debug)]
pub struct Searcher<'a> {
    volcano: &'a Volcano,
    start: ValveId,
    bit_for: HashMap<ValveId, u32>,
}

/// Memo key. Opened valves are a bitmask over the searcher's valve
/// ordering, so two histories that opened the same valves in different
/// orders land on the same entry. Crew is tracked as a count remaining,
/// never an index: members are interchangeable.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
struct State {
    time_left: i64,
    at: ValveId,
    opened: u64,
    crew_left: u32,
}

impl<'a> Searcher<'a> {
    pub fn new(volcano: &'a Volcano, start: ValveId) -> Result<Self, MalformedNetwork> {
        if !volcano.contains(start) {
            return Err(MalformedNetwork::MissingStart(volcano.label(start)));
        }
        if volcano.len() > 64 {
            return Err(MalformedNetwork::TooManyValves(volcano.len()));
        }
        for id in volcano.valves() {
            for t in volcano.tunnels(id) {
                if !volcano.contains(t.to) {
                    return Err(MalformedNetwork::DanglingTunnel {
                        from: volcano.label(id),
                        to: volcano.label(t.to),
                    });
                }
                if t.cost == 0 {
                    return Err(MalformedNetwork::ZeroCostTunnel {
                        from: volcano.label(id),
                        to: volcano.label(t.to),
                    });
                }
            }
        }

        let mut ids: Vec<ValveId> = volcano.valves().collect();
        ids.sort();
        let bit_for = ids.into_iter().zip(0..).collect();

        Ok(Searcher { volcano, start, bit_for })
    }

    /// Most pressure one agent can release in `minutes`, starting at the
    /// searcher's start valve with every valve closed.
    pub fn most_pressure(&self, minutes: u32) -> usize {
        let mut cache = HashMap::new();
        self.search(minutes as i64, self.start, 0, 0, 0, &mut cache)
    }

    /// Cooperative variant: `crew` members take turns, each starting back
    /// at the start valve with a fresh `minutes_each` budget but inheriting
    /// the valves opened by everyone before them.
    pub fn most_pressure_crew(&self, minutes_each: u32, crew: u32) -> Result<usize, InvalidBudget> {
        if crew == 0 {
            return Err(InvalidBudget::EmptyCrew);
        }
        let mut cache = HashMap::new();
        let budget = minutes_each as i64;
        Ok(self.search(budget, self.start, 0, crew - 1, budget, &mut cache))
    }

    fn search(
        &self,
        time_left: i64,
        at: ValveId,
        opened: u64,
        crew_left: u32,
        shift_budget: i64,
        cache: &mut HashMap<State, usize>,
    ) -> usize {
        if time_left <= 0 {
            if crew_left == 0 {
                return 0;
            }
            // Next crew member: fresh clock, same opened valves.
            return self.search(shift_budget, self.start, opened, crew_left - 1, shift_budget, cache);
        }

        let state = State { time_left, at, opened, crew_left };
        if let Some(&pressure) = cache.get(&state) {
            return pressure;
        }

        let mut pressure = 0;
        for &Tunnel { to, cost } in self.volcano.tunnels(at) {
            let bit = 1u64 << self.bit_for[&to];

            // First option: walk there and open it. Opening takes a minute
            // on top of the walk; arriving too late just releases nothing.
            if opened & bit == 0 {
                let after = time_left - cost as i64 - 1;
                let released = self.volcano.flow(to) * after.max(0) as usize;
                pressure = pressure.max(
                    released + self.search(after, to, opened | bit, crew_left, shift_budget, cache),
                );
            }

            // Second option: walk through without opening.
            pressure = pressure
                .max(self.search(time_left - cost as i64, to, opened, crew_left, shift_budget, cache));
        }

        cache.insert(state, pressure);
        pressure
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::compact::compact;

    const EXAMPLE: &str = "\
Valve AA has flow rate=0; tunnels lead to valves DD, II, BB
Valve BB has flow rate=13; tunnels lead to valves CC, AA
Valve CC has flow rate=2; tunnels lead to valves DD, BB
Valve DD has flow rate=20; tunnels lead to valves CC, AA, EE
Valve EE has flow rate=3; tunnels lead to valves FF, DD
Valve FF has flow rate=0; tunnels lead to valves EE, GG
Valve GG has flow rate=0; tunnels lead to valves FF, HH
Valve HH has flow rate=22; tunnel leads to valve GG
Valve II has flow rate=0; tunnels lead to valves AA, JJ
Valve JJ has flow rate=21; tunnel leads to valve II";

    fn compacted_example() -> (Volcano, ValveId) {
        let volcano: Volcano = EXAMPLE.parse().unwrap();
        let start = volcano.handle("AA").unwrap();
        (compact(&volcano, start).unwrap(), start)
    }

    // AA (flow 0) sits 2 minutes from AV (flow 10) and 1 minute from BV
    // (flow 5); AV and BV aren't joined directly.
    fn forked_network() -> (Volcano, ValveId) {
        let mut volcano = Volcano::new();
        let aa = volcano.add_valve("AA", 0);
        let av = volcano.add_valve("AV", 10);
        let bv = volcano.add_valve("BV", 5);
        volcano.link(aa, av, 2);
        volcano.link(aa, bv, 1);
        (volcano, aa)
    }

    #[test]
    fn test_most_pressure_example() {
        let (volcano, start) = compacted_example();
        let searcher = Searcher::new(&volcano, start).unwrap();
        assert_eq!(searcher.most_pressure(30), 1651);
    }

    #[test]
    fn test_crew_of_two_example() {
        // Crew members only interact through the opened set, so two
        // sequential 26-minute shifts reach the same optimum as two
        // concurrent agents: 1707 on this network.
        let (volcano, start) = compacted_example();
        let searcher = Searcher::new(&volcano, start).unwrap();
        assert_eq!(searcher.most_pressure_crew(26, 2).unwrap(), 1707);
    }

    #[test]
    fn test_crew_of_one_matches_solo() {
        let (volcano, start) = compacted_example();
        let searcher = Searcher::new(&volcano, start).unwrap();
        assert_eq!(searcher.most_pressure_crew(30, 1).unwrap(), searcher.most_pressure(30));
    }

    #[test]
    fn test_more_crew_never_hurts() {
        let (volcano, start) = compacted_example();
        let searcher = Searcher::new(&volcano, start).unwrap();
        let solo = searcher.most_pressure(10);
        for crew in 1..=3 {
            assert!(searcher.most_pressure_crew(10, crew).unwrap() >= solo);
        }
    }

    #[test]
    fn test_monotonic_in_budget() {
        let (volcano, start) = compacted_example();
        let searcher = Searcher::new(&volcano, start).unwrap();
        let mut prev = 0;
        for minutes in 0..=15 {
            let best = searcher.most_pressure(minutes);
            assert!(best >= prev, "budget {minutes} lost pressure: {best} < {prev}");
            prev = best;
        }
    }

    #[test]
    fn test_zero_budget() {
        let (volcano, start) = compacted_example();
        let searcher = Searcher::new(&volcano, start).unwrap();
        assert_eq!(searcher.most_pressure(0), 0);
    }

    #[test]
    fn test_lone_valve() {
        let mut volcano = Volcano::new();
        let aa = volcano.add_valve("AA", 7);
        let searcher = Searcher::new(&volcano, aa).unwrap();
        assert_eq!(searcher.most_pressure(30), 0);
    }

    #[test]
    fn test_forked_network_solo() {
        // Open AV at minute 7 (10 * 7 = 70), walk back through AA and open
        // BV at minute 3 (5 * 3 = 15).
        let (volcano, start) = forked_network();
        let searcher = Searcher::new(&volcano, start).unwrap();
        assert_eq!(searcher.most_pressure(10), 85);
    }

    #[test]
    fn test_forked_network_crew_splits_the_work() {
        // Five minutes is only enough for one valve per member: one takes
        // AV (10 * 2), the other BV (5 * 3).
        let (volcano, start) = forked_network();
        let searcher = Searcher::new(&volcano, start).unwrap();
        assert_eq!(searcher.most_pressure_crew(5, 2).unwrap(), 35);
    }

    #[test]
    fn test_empty_crew() {
        let (volcano, start) = forked_network();
        let searcher = Searcher::new(&volcano, start).unwrap();
        assert_eq!(searcher.most_pressure_crew(10, 0), Err(InvalidBudget::EmptyCrew));
    }

    #[test]
    fn test_too_many_valves() {
        let mut volcano = Volcano::new();
        let mut prev = volcano.add_valve("V0", 0);
        for i in 1..70 {
            let next = volcano.add_valve(&format!("V{i}"), i);
            volcano.link(prev, next, 1);
            prev = next;
        }
        let start = volcano.handle("V0").unwrap();
        assert_eq!(Searcher::new(&volcano, start).unwrap_err(), MalformedNetwork::TooManyValves(70));
    }
}
