//! Unit tests for wh-core primitives.

#[cfg(test)]
mod ids {
    use crate::{OrderId, ShelfId, WorkerId};

    #[test]
    fn index_roundtrip() {
        let id = WorkerId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(WorkerId::from_index(42), id);
    }

    #[test]
    fn ordering() {
        assert!(WorkerId(0) < WorkerId(1));
        assert!(OrderId(100) > OrderId(99));
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(WorkerId::INVALID.0, u32::MAX);
        assert_eq!(ShelfId::default(), ShelfId::INVALID);
    }

    #[test]
    fn display() {
        assert_eq!(WorkerId(7).to_string(), "w7");
        assert_eq!(OrderId(12).to_string(), "o12");
        assert_eq!(WorkerId::INVALID.to_string(), "w?");
        assert!(!ShelfId::default().is_valid());
    }
}

#[cfg(test)]
mod cell {
    use crate::Cell;

    #[test]
    fn manhattan_is_symmetric() {
        let a = Cell::new(0, 0);
        let b = Cell::new(3, -4);
        assert_eq!(a.manhattan(b), 7);
        assert_eq!(b.manhattan(a), 7);
        assert_eq!(a.manhattan(a), 0);
    }

    #[test]
    fn adjacent_order_is_fixed() {
        let c = Cell::new(2, 2);
        assert_eq!(
            c.adjacent(),
            [Cell::new(2, 3), Cell::new(3, 2), Cell::new(2, 1), Cell::new(1, 2)]
        );
        assert!(c.adjacent().iter().all(|&n| c.is_adjacent(n)));
    }

    #[test]
    fn display() {
        assert_eq!(Cell::new(4, 0).to_string(), "(4, 0)");
    }
}

#[cfg(test)]
mod time {
    use crate::{SimClock, Tick};

    #[test]
    fn tick_arithmetic() {
        let t = Tick(10);
        assert_eq!(t + 5, Tick(15));
        assert_eq!(Tick(15) - t, 5);
        assert_eq!(t.next(), Tick(11));
        assert_eq!(Tick(15).since(t), 5);
    }

    #[test]
    fn clock_advance() {
        let mut clock = SimClock::new(2);
        clock.advance();
        clock.advance();
        assert_eq!(clock.current_tick, Tick(2));
        assert_eq!(clock.elapsed_secs(), 4);
    }

    #[test]
    fn clock_display() {
        let mut clock = SimClock::new(61);
        clock.advance();
        assert_eq!(clock.to_string(), "T1 (00:01:01)");
    }
}

#[cfg(test)]
mod config {
    use crate::{SearchLimits, SimConfig};

    #[test]
    fn default_is_valid() {
        assert!(SimConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_replan_threshold_rejected() {
        let cfg = SimConfig { replan_after_blocks: 0, ..SimConfig::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn zero_search_limits_rejected() {
        let cfg = SimConfig {
            search: SearchLimits { max_expansions: 0, max_path_len: 10 },
            ..SimConfig::default()
        };
        assert!(cfg.validate().is_err());
    }
}

#[cfg(test)]
mod rng {
    use crate::SimRng;

    #[test]
    fn same_seed_same_stream() {
        let mut a = SimRng::new(7);
        let mut b = SimRng::new(7);
        let xs: Vec<u64> = (0..8).map(|_| a.random()).collect();
        let ys: Vec<u64> = (0..8).map(|_| b.random()).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn gen_bool_clamps() {
        let mut rng = SimRng::new(3);
        assert!(rng.gen_bool(1.5));
        assert!(!rng.gen_bool(-0.5));
    }

    #[test]
    fn choose_empty_is_none() {
        let mut rng = SimRng::new(1);
        let empty: [u8; 0] = [];
        assert!(rng.choose(&empty).is_none());
    }
}
