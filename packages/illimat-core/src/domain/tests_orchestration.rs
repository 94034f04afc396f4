//! Tests for the driver loop: composite expansion, queue ordering, and
//! strict-LIFO reversal.

use crate::domain::actions::{Action, FIELD_SEED_CARDS, HAND_LIMIT, SHORT_HAND};
use crate::domain::cards::{Card, Rank, Suit};
use crate::domain::deck::Deck;
use crate::domain::game::{Game, GameConfig};
use crate::domain::luminary::LuminaryCard;
use crate::domain::okus::{OkusId, OkusPosition};
use crate::domain::state::GameState;
use crate::errors::domain::{DomainError, InvariantKind};

fn four_player_state() -> GameState {
    let config = GameConfig::new(4).unwrap();
    Game::with_seed(config, 7).state
}

#[test]
fn initial_deal_enqueues_the_exact_child_sequence() {
    let mut state = four_player_state();
    let mut action = Action::InitialDeal {
        dealer: 0,
        undo: None,
    };
    let children = action.perform(&mut state).unwrap();

    assert_eq!(children.len(), 16);

    for (field, child) in children[..4].iter().enumerate() {
        assert_eq!(
            *child,
            Action::SeedField {
                actor: 0,
                field: field as u8,
                count: FIELD_SEED_CARDS,
                undo: None,
            }
        );
    }

    // Left of dealer gets the short hand, dealer is dealt last.
    let expected_hands = [(1u8, SHORT_HAND), (2, HAND_LIMIT), (3, HAND_LIMIT), (0, HAND_LIMIT)];
    for ((player, count), child) in expected_hands.iter().zip(&children[4..8]) {
        assert_eq!(
            *child,
            Action::DealHand {
                actor: 0,
                player: *player,
                count: *count,
                undo: None,
            }
        );
    }

    for (index, child) in children[8..12].iter().enumerate() {
        assert_eq!(
            *child,
            Action::PlaceOkus {
                actor: 0,
                okus: OkusId::ALL[index],
                undo: None,
            }
        );
    }

    for (field, child) in children[12..16].iter().enumerate() {
        assert_eq!(
            *child,
            Action::DealLuminary {
                actor: 0,
                field: field as u8,
                undo: None,
            }
        );
    }

    // The composite itself mutated nothing.
    assert!(state.players.iter().all(|p| p.hand.is_empty()));
    assert!(state.fields.iter().all(|f| f.piles().is_empty()));
}

#[test]
fn children_run_before_previously_enqueued_actions() {
    let config = GameConfig::new(4).unwrap();
    let mut game = Game::with_seed(config, 11);

    // The queue starts as [InitialDeal, BeginTurn]; after one step the
    // composite's children must sit in front of the BeginTurn.
    assert!(game.step().unwrap());
    let kinds: Vec<&'static str> = game.pending().iter().map(Action::kind).collect();
    let mut expected = vec!["SeedField"; 4];
    expected.extend(vec!["DealHand"; 4]);
    expected.extend(vec!["PlaceOkus"; 4]);
    expected.extend(vec!["DealLuminary"; 4]);
    expected.push("BeginTurn");
    assert_eq!(kinds, expected);
}

#[test]
fn full_deal_produces_the_expected_board() {
    let config = GameConfig::new(4).unwrap();
    let mut game = Game::with_seed(config, 13);
    let dealer = game.dealer();
    game.run_pending().unwrap();

    for field in &game.state.fields {
        assert_eq!(field.piles().len(), FIELD_SEED_CARDS);
        assert!(field.luminary.is_face_down());
    }
    for (index, player) in game.state.players.iter().enumerate() {
        let expected = if index as u8 == (dealer + 1) % 4 {
            SHORT_HAND
        } else {
            HAND_LIMIT
        };
        assert_eq!(player.hand.len(), expected, "player {index}");
    }
    assert_eq!(
        game.state
            .okus
            .iter()
            .filter(|o| **o == OkusPosition::OnIllimat)
            .count(),
        4
    );
    // 65 cards - 12 seeded - 15 dealt
    assert_eq!(game.state.card_deck.len(), 65 - 12 - 15);
    assert_eq!(game.state.luminary_deck.len(), 4);
    assert_eq!(
        game.state.active_player_index,
        ((dealer + 1) % 4) as usize
    );
}

#[test]
fn unwinding_the_whole_stack_restores_the_pristine_state() {
    let config = GameConfig::new(3).unwrap();
    let mut game = Game::with_seed(config, 17);
    let pristine = Game::with_seed(config, 17).state;

    let performed = game.run_pending().unwrap();
    assert!(performed > 0);
    assert_ne!(game.state, pristine);

    while !game.completed().is_empty() {
        game.unwind_last().unwrap();
    }
    assert_eq!(game.state, pristine);
}

#[test]
fn unwind_on_an_empty_stack_is_out_of_order() {
    let config = GameConfig::new(2).unwrap();
    let mut game = Game::with_seed(config, 19);
    let err = game.unwind_last().unwrap_err();
    assert!(matches!(
        err,
        DomainError::Invariant(InvariantKind::UnwindOutOfOrder, _)
    ));
}

#[test]
fn step_on_an_empty_queue_reports_idle() {
    let config = GameConfig::new(2).unwrap();
    let mut game = Game::with_seed(config, 23);
    game.run_pending().unwrap();
    assert!(!game.step().unwrap());
}

#[test]
fn end_turn_hands_off_to_the_next_player_with_cards() {
    let mut state = GameState::new(
        3,
        Deck::new(Vec::new()),
        Deck::new(Vec::new()),
        0,
    );
    state.active_player_index = 0;
    state.players[0].hand = vec![];
    state.players[1].hand = vec![];
    state.players[2].hand = vec![Card::new(Rank::Five, Suit::Spring)];

    let mut action = Action::EndTurn {
        player: 0,
        undo: None,
    };
    let children = action.perform(&mut state).unwrap();
    assert_eq!(children.len(), 2);
    assert_eq!(children[0].kind(), "DrawUp");
    assert_eq!(
        children[1],
        Action::BeginTurn {
            player: 2,
            undo: None,
        }
    );
}

#[test]
fn end_turn_with_no_hands_left_moves_to_scoring() {
    let mut state = GameState::new(
        2,
        Deck::new(Vec::new()),
        Deck::new(Vec::new()),
        0,
    );
    state.active_player_index = 1;

    let mut action = Action::EndTurn {
        player: 1,
        undo: None,
    };
    let children = action.perform(&mut state).unwrap();
    assert_eq!(children.last().map(Action::kind), Some("ScoreRound"));
}

#[test]
fn luminary_deck_round_trips_through_the_deal() {
    let mut state = GameState::new(
        2,
        Deck::new(Vec::new()),
        Deck::new(vec![LuminaryCard::TheRake, LuminaryCard::TheUnion]),
        0,
    );
    let pristine = state.clone();
    let mut first = Action::DealLuminary {
        actor: 0,
        field: 0,
        undo: None,
    };
    let mut second = Action::DealLuminary {
        actor: 0,
        field: 1,
        undo: None,
    };
    first.perform(&mut state).unwrap();
    second.perform(&mut state).unwrap();
    second.unwind(&mut state).unwrap();
    first.unwind(&mut state).unwrap();
    assert_eq!(state, pristine);
}
