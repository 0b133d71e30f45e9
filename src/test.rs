#[cfg(test)]
pub mod test {
    use anyhow::{anyhow, Result};
    use proptest::prelude::*;

    use crate::agent::{Agent, MinimaxAgent, MinimaxLookaheadAgent, MinimaxPruneAgent};
    use crate::evaluation::evaluate;
    use crate::search::Search;
    use crate::transposition_table::TranspositionTable;
    use crate::{GameError, GameState, Player};

    // plays each move into the first open column at or after it, wrapping around
    fn play_wrapping(rows: usize, cols: usize, moves: &[usize]) -> Result<GameState> {
        let mut state = GameState::new(rows, cols)?;
        for &m in moves {
            if state.is_full() {
                break;
            }
            let column = (0..cols)
                .map(|i| (m + i) % cols)
                .find(|&c| state.playable(c))
                .ok_or_else(|| anyhow!("no open column in {}", state))?;
            state = state.play(column)?;
        }
        Ok(state)
    }

    #[test]
    pub fn terminal_utility() -> Result<()> {
        //XXX
        //OOX
        //XOO
        let state = GameState::from_rows(&["XXX", "OOX", "XOO"])?;
        assert!(state.is_terminal());
        assert_eq!(state.utility()?, 9);

        //OOO
        //XXO
        //OXX  >>> an O row and nothing else
        let state = GameState::from_rows(&["OOO", "XXO", "OXX"])?;
        assert_eq!(state.utility()?, -9);
        Ok(())
    }

    #[test]
    pub fn minimax_agrees_with_alpha_beta() -> Result<()> {
        let positions = vec![
            GameState::new(3, 3)?,
            GameState::from_moves(3, 4, &[1, 2, 1, 2])?,
            GameState::from_moves(4, 4, &[0, 1, 2, 3, 3, 2, 1, 0])?,
            GameState::with_blocks(3, 4, &[(0, 0), (1, 3)])?,
            GameState::from_rows(&["....", ".#..", "XOX.", "OXOX"])?,
        ];

        for state in positions {
            let mut exact = Search::new();
            let mut pruned = Search::new();
            let value = exact.minimax(&state)?;
            assert_eq!(value, pruned.minimax_ab(&state)?, "position:\n{}", state);
            assert!(pruned.node_count <= exact.node_count);
        }
        Ok(())
    }

    #[test]
    pub fn pruning_constructs_fewer_states() -> Result<()> {
        let state = GameState::from_moves(4, 4, &[1, 2, 1, 2, 0, 3])?;

        let mut minimax = MinimaxAgent::new();
        let mut prune = MinimaxPruneAgent::new();
        let (minimax_move, _) = minimax.get_move(&state)?;
        let (prune_move, _) = prune.get_move(&state)?;

        assert_eq!(minimax_move, prune_move);
        assert!(
            prune.node_count() < minimax.node_count(),
            "alpha-beta built {} states, minimax {}",
            prune.node_count(),
            minimax.node_count()
        );
        Ok(())
    }

    #[test]
    pub fn successors_ascend() -> Result<()> {
        let state = GameState::from_rows(&["X.#..", "OXO.X"])?;
        let columns: Vec<usize> = state.successors().into_iter().map(|(c, _)| c).collect();
        assert_eq!(columns, vec![1, 3, 4]);
        assert!(columns.windows(2).all(|pair| pair[0] < pair[1]));
        Ok(())
    }

    #[test]
    pub fn ties_go_to_the_lowest_column() -> Result<()> {
        // a single row of three can never hold a run, so every move is worth 0
        let state = GameState::new(1, 3)?;
        assert_eq!(MinimaxAgent::new().get_move(&state)?.0, 0);
        assert_eq!(MinimaxPruneAgent::new().get_move(&state)?.0, 0);
        assert_eq!(MinimaxLookaheadAgent::new(1).get_move(&state)?.0, 0);

        // the chosen column must be the first one holding the best value
        //...
        //..X
        //OXO
        let state = GameState::from_rows(&["...", "..X", "OXO"])?;
        assert_eq!(state.next_player(), Player::One);
        let mut values = Vec::new();
        for (_, child) in state.successors() {
            values.push(Search::new().minimax(&child)?);
        }
        let best = *values.iter().max().ok_or_else(|| anyhow!("no successors"))?;
        let first_best = values.iter().position(|&v| v == best).unwrap_or(0);
        assert_eq!(MinimaxAgent::new().get_move(&state)?.0, first_best);
        assert_eq!(MinimaxPruneAgent::new().get_move(&state)?.0, first_best);
        Ok(())
    }

    #[test]
    pub fn depth_limit_zero_only_evaluates() -> Result<()> {
        let state = GameState::from_rows(&["....", "X...", "XO.O"])?;
        let mut search = Search::new();
        assert_eq!(search.minimax_depth_limited(&state, 0)?, evaluate(&state));
        assert_eq!(search.node_count, 0);
        Ok(())
    }

    #[test]
    pub fn siblings_see_the_same_budget() -> Result<()> {
        let state = GameState::from_rows(&["....", "X...", "XO.O"])?;
        let successors = state.successors();
        assert!(successors.len() > 1);

        let mut expected = f64::NEG_INFINITY;
        for (_, child) in &successors {
            // every child searched on its own, as if it were the first sibling
            expected = expected.max(Search::new().minimax_depth_limited(child, 1)?);
        }
        assert_eq!(Search::new().minimax_depth_limited(&state, 2)?, expected);
        Ok(())
    }

    #[test]
    pub fn deep_lookahead_is_exact() -> Result<()> {
        let state = GameState::from_moves(3, 4, &[0, 0, 3, 3, 1])?;
        let exact = Search::new().minimax(&state)?;
        let remaining = state.cells().iter().filter(|c| c.is_empty()).count() as u32;
        assert_eq!(
            Search::new().minimax_depth_limited(&state, remaining)?,
            f64::from(exact)
        );
        Ok(())
    }

    #[test]
    pub fn parallel_root_search_matches() -> Result<()> {
        let state = GameState::from_moves(4, 4, &[0, 1, 2, 3, 0, 1])?;

        let sequential = MinimaxAgent::new().get_move(&state)?;
        let parallel = MinimaxAgent::new().parallel(true).get_move(&state)?;
        assert_eq!(sequential, parallel);

        let sequential = MinimaxPruneAgent::new().get_move(&state)?;
        let parallel = MinimaxPruneAgent::new().parallel(true).get_move(&state)?;
        assert_eq!(sequential, parallel);
        Ok(())
    }

    #[test]
    pub fn memoized_agent_reuses_positions() -> Result<()> {
        let state = GameState::from_moves(3, 4, &[1, 2])?;
        let mut plain = MinimaxAgent::new();
        let mut memoized = MinimaxAgent::with_transposition_table(TranspositionTable::new());

        assert_eq!(plain.get_move(&state)?, memoized.get_move(&state)?);
        assert!(memoized.node_count() < plain.node_count());
        Ok(())
    }

    #[test]
    pub fn full_column_is_an_invalid_move() -> Result<()> {
        let state = GameState::from_moves(2, 2, &[0, 0])?;
        match state.play(0) {
            Err(GameError::InvalidMove { column: 0, .. }) => Ok(()),
            other => Err(anyhow!("expected an invalid move, got {:?}", other)),
        }
    }

    #[test]
    pub fn play_out_a_game() -> Result<()> {
        let mut state = GameState::with_blocks(3, 4, &[(2, 1)])?;
        let mut agents: Vec<Box<dyn Agent>> = vec![
            Box::new(MinimaxLookaheadAgent::new(2)),
            Box::new(MinimaxPruneAgent::new()),
        ];
        let count_before = GameState::state_count();

        let mut plies = 0;
        while !state.is_full() {
            let agent = match state.next_player() {
                Player::One => &mut agents[0],
                Player::Two => &mut agents[1],
            };
            let (column, next) = agent.get_move(&state)?;
            assert!(state.playable(column));
            state = next;
            plies += 1;
        }

        assert_eq!(plies, 11);
        state.utility()?;
        assert!(GameState::state_count() > count_before);
        Ok(())
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn alpha_beta_value_is_exact(moves in prop::collection::vec(0usize..4, 8..12)) {
            let state = play_wrapping(4, 4, &moves).unwrap();
            let mut exact = Search::new();
            let mut pruned = Search::new();
            prop_assert_eq!(exact.minimax(&state).unwrap(), pruned.minimax_ab(&state).unwrap());
            prop_assert!(pruned.node_count <= exact.node_count);
        }

        #[test]
        fn evaluation_of_full_board_is_utility(moves in prop::collection::vec(0usize..5, 20)) {
            let state = play_wrapping(4, 5, &moves).unwrap();
            prop_assert!(state.is_full());
            prop_assert_eq!(evaluate(&state), f64::from(state.utility().unwrap()));
        }

        #[test]
        fn moves_alternate(moves in prop::collection::vec(0usize..5, 0..20)) {
            let state = play_wrapping(4, 5, &moves).unwrap();
            let ones = state.cells().iter().filter(|c| c.player() == Some(Player::One)).count();
            let twos = state.cells().iter().filter(|c| c.player() == Some(Player::Two)).count();
            prop_assert!(ones == twos || ones == twos + 1);
            prop_assert_eq!(state.next_player() == Player::One, ones == twos);
        }
    }
}
