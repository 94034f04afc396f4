//! Reversible actions: every state transition is a tagged variant carrying
//! an explicit inverse.
//!
//! `perform` validates against the current state, applies the transition,
//! and captures exactly what it changed (which cards were drawn, in what
//! order, which rotation was in effect) so `unwind` can replay it precisely.
//! Composite actions mutate nothing themselves; they return their ordered
//! children for the driver loop to enqueue. Unwind is only legal in strict
//! LIFO order off the completed stack.

use crate::domain::cards::Card;
use crate::domain::combinatorics::value_sums;
use crate::domain::luminary::{LuminaryCard, LuminarySlot};
use crate::domain::okus::{OkusId, OkusPosition};
use crate::domain::pile::{Pile, PileId, PileKind};
use crate::domain::scoring;
use crate::domain::season::{rotation_for, Season};
use crate::domain::state::{seat_offset, FieldId, GameState, PlayerId, FIELDS};
use crate::errors::domain::{DomainError, InvariantKind, StructuralKind, ValidationKind};

/// Hand size dealt and drawn back up to.
pub const HAND_LIMIT: usize = 4;
/// The player left of the dealer starts one card short and acts first.
pub const SHORT_HAND: usize = 3;
/// Cards sown into each field at the start of a round.
pub const FIELD_SEED_CARDS: usize = 3;
/// Cards The River sows into its field when revealed.
pub const RIVER_SEED_CARDS: usize = 6;

#[derive(Debug, Clone, PartialEq)]
pub struct SeedFieldUndo {
    drawn: Vec<Card>,
    piles: Vec<PileId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BeginTurnUndo {
    prev_active: usize,
    prev_turn_number: u16,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChangeSeasonUndo {
    prev_rotation: u8,
    locked: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SowUndo {
    hand_pos: usize,
    hand_card: Card,
    pile: PileId,
    prev_rotation: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HarvestUndo {
    hand_pos: usize,
    hand_card: Card,
    /// Removed piles with their positions, ascending, for exact reinsertion.
    removed: Vec<(usize, Pile)>,
    harvest_len_before: usize,
    prev_rotation: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StockpileUndo {
    hand_pos: usize,
    hand_card: Card,
    target_pos: usize,
    target_pile: Pile,
    pile: PileId,
    prev_rotation: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExchangeUndo {
    hand_pos: usize,
    hand_card: Card,
    pile_pos: usize,
    old_pile: Pile,
    new_pile: PileId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DealLuminaryUndo {
    dealt: Option<LuminaryCard>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CollectOkusUndo {
    collected: Option<OkusId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RevealLuminaryUndo {
    card: LuminaryCard,
    prev_override: Option<Season>,
    prev_ignore_season: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClaimLuminaryUndo {
    card: LuminaryCard,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreRoundUndo {
    prev_scores: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Composite: seeds the fields, deals hands (left of dealer short and
    /// first, dealer last), places one okus per player, deals one luminary
    /// per field. Mutates nothing itself.
    InitialDeal {
        dealer: PlayerId,
        undo: Option<()>,
    },
    SeedField {
        actor: PlayerId,
        field: FieldId,
        count: usize,
        undo: Option<SeedFieldUndo>,
    },
    DealHand {
        actor: PlayerId,
        player: PlayerId,
        count: usize,
        undo: Option<Vec<Card>>,
    },
    PlaceOkus {
        actor: PlayerId,
        okus: OkusId,
        undo: Option<OkusPosition>,
    },
    DealLuminary {
        actor: PlayerId,
        field: FieldId,
        undo: Option<DealLuminaryUndo>,
    },
    BeginTurn {
        player: PlayerId,
        undo: Option<BeginTurnUndo>,
    },
    /// Composite: refills the ending player's hand, then hands the turn to
    /// the next player still holding cards, or to round scoring.
    EndTurn {
        player: PlayerId,
        undo: Option<()>,
    },
    DrawUp {
        player: PlayerId,
        undo: Option<Vec<Card>>,
    },
    ChangeSeason {
        actor: PlayerId,
        season: Season,
        field: FieldId,
        lock_illimat: bool,
        undo: Option<ChangeSeasonUndo>,
    },
    Sow {
        actor: PlayerId,
        field: FieldId,
        card: Card,
        undo: Option<SowUndo>,
    },
    Harvest {
        actor: PlayerId,
        field: FieldId,
        card: Card,
        /// Declared value the card is played at; must be one of the card's
        /// achievable values.
        value: u16,
        /// Pile handles being collected, ascending.
        targets: Vec<PileId>,
        undo: Option<HarvestUndo>,
    },
    Stockpile {
        actor: PlayerId,
        field: FieldId,
        card: Card,
        target: PileId,
        /// Declared total of the new stockpile.
        value: u8,
        undo: Option<StockpileUndo>,
    },
    StealOkus {
        actor: PlayerId,
        victim: PlayerId,
        undo: Option<OkusId>,
    },
    ExchangeCard {
        actor: PlayerId,
        field: FieldId,
        hand_card: Card,
        pile: PileId,
        undo: Option<ExchangeUndo>,
    },
    CollectOkus {
        player: PlayerId,
        undo: Option<CollectOkusUndo>,
    },
    RevealLuminary {
        actor: PlayerId,
        field: FieldId,
        undo: Option<RevealLuminaryUndo>,
    },
    ClaimLuminary {
        player: PlayerId,
        field: FieldId,
        undo: Option<ClaimLuminaryUndo>,
    },
    ScoreRound {
        actor: PlayerId,
        undo: Option<ScoreRoundUndo>,
    },
}

impl Action {
    /// The player this action is attributed to.
    pub fn actor(&self) -> PlayerId {
        match self {
            Action::InitialDeal { dealer, .. } => *dealer,
            Action::SeedField { actor, .. }
            | Action::DealHand { actor, .. }
            | Action::PlaceOkus { actor, .. }
            | Action::DealLuminary { actor, .. }
            | Action::ChangeSeason { actor, .. }
            | Action::Sow { actor, .. }
            | Action::Harvest { actor, .. }
            | Action::Stockpile { actor, .. }
            | Action::StealOkus { actor, .. }
            | Action::ExchangeCard { actor, .. }
            | Action::RevealLuminary { actor, .. }
            | Action::ScoreRound { actor, .. } => *actor,
            Action::BeginTurn { player, .. }
            | Action::EndTurn { player, .. }
            | Action::DrawUp { player, .. }
            | Action::CollectOkus { player, .. }
            | Action::ClaimLuminary { player, .. } => *player,
        }
    }

    /// Stable name for logging and error text.
    pub fn kind(&self) -> &'static str {
        match self {
            Action::InitialDeal { .. } => "InitialDeal",
            Action::SeedField { .. } => "SeedField",
            Action::DealHand { .. } => "DealHand",
            Action::PlaceOkus { .. } => "PlaceOkus",
            Action::DealLuminary { .. } => "DealLuminary",
            Action::BeginTurn { .. } => "BeginTurn",
            Action::EndTurn { .. } => "EndTurn",
            Action::DrawUp { .. } => "DrawUp",
            Action::ChangeSeason { .. } => "ChangeSeason",
            Action::Sow { .. } => "Sow",
            Action::Harvest { .. } => "Harvest",
            Action::Stockpile { .. } => "Stockpile",
            Action::StealOkus { .. } => "StealOkus",
            Action::ExchangeCard { .. } => "ExchangeCard",
            Action::CollectOkus { .. } => "CollectOkus",
            Action::RevealLuminary { .. } => "RevealLuminary",
            Action::ClaimLuminary { .. } => "ClaimLuminary",
            Action::ScoreRound { .. } => "ScoreRound",
        }
    }

    pub fn is_performed(&self) -> bool {
        match self {
            Action::InitialDeal { undo, .. } => undo.is_some(),
            Action::SeedField { undo, .. } => undo.is_some(),
            Action::DealHand { undo, .. } => undo.is_some(),
            Action::PlaceOkus { undo, .. } => undo.is_some(),
            Action::DealLuminary { undo, .. } => undo.is_some(),
            Action::BeginTurn { undo, .. } => undo.is_some(),
            Action::EndTurn { undo, .. } => undo.is_some(),
            Action::DrawUp { undo, .. } => undo.is_some(),
            Action::ChangeSeason { undo, .. } => undo.is_some(),
            Action::Sow { undo, .. } => undo.is_some(),
            Action::Harvest { undo, .. } => undo.is_some(),
            Action::Stockpile { undo, .. } => undo.is_some(),
            Action::StealOkus { undo, .. } => undo.is_some(),
            Action::ExchangeCard { undo, .. } => undo.is_some(),
            Action::CollectOkus { undo, .. } => undo.is_some(),
            Action::RevealLuminary { undo, .. } => undo.is_some(),
            Action::ClaimLuminary { undo, .. } => undo.is_some(),
            Action::ScoreRound { undo, .. } => undo.is_some(),
        }
    }

    /// Apply the transition. Returns the ordered child actions to enqueue
    /// (empty for leaf actions). Validation failures leave the state
    /// untouched.
    pub fn perform(&mut self, state: &mut GameState) -> Result<Vec<Action>, DomainError> {
        if self.is_performed() {
            return Err(DomainError::invariant(
                InvariantKind::AlreadyPerformed,
                format!("{} already performed", self.kind()),
            ));
        }
        match self {
            Action::InitialDeal { dealer, undo } => {
                let children = initial_deal_children(state, *dealer)?;
                *undo = Some(());
                Ok(children)
            }
            Action::SeedField {
                field,
                count,
                undo,
                ..
            } => {
                GameState::require_field(*field, "SeedField")?;
                let drawn = state.card_deck.draw_up_to(*count);
                let field_state = &mut state.fields[*field as usize];
                let piles = drawn
                    .iter()
                    .map(|&card| field_state.add_loose_pile(vec![card.revealed()]))
                    .collect();
                *undo = Some(SeedFieldUndo { drawn, piles });
                Ok(Vec::new())
            }
            Action::DealHand {
                player,
                count,
                undo,
                ..
            } => {
                state.require_player(*player, "DealHand")?;
                let drawn = state.card_deck.draw_up_to(*count);
                state.players[*player as usize].hand.extend(drawn.iter().copied());
                *undo = Some(drawn);
                Ok(Vec::new())
            }
            Action::PlaceOkus { okus, undo, .. } => {
                let slot = &mut state.okus[*okus as usize];
                if *slot != OkusPosition::Unplaced {
                    return Err(DomainError::structural(
                        StructuralKind::Other(format!("okus {okus} already in play")),
                        "PlaceOkus",
                    ));
                }
                *undo = Some(*slot);
                *slot = OkusPosition::OnIllimat;
                Ok(Vec::new())
            }
            Action::DealLuminary { field, undo, .. } => {
                GameState::require_field(*field, "DealLuminary")?;
                let drawn = state.luminary_deck.draw_up_to(1);
                let slot = &mut state.fields[*field as usize].luminary;
                match drawn.first() {
                    None => {
                        *undo = Some(DealLuminaryUndo { dealt: None });
                    }
                    Some(&card) => {
                        if *slot != LuminarySlot::Empty {
                            return Err(DomainError::structural(
                                StructuralKind::LuminarySlotMismatch,
                                format!("field {field} already has a luminary"),
                            ));
                        }
                        *slot = LuminarySlot::FaceDown(card);
                        *undo = Some(DealLuminaryUndo { dealt: Some(card) });
                    }
                }
                Ok(Vec::new())
            }
            Action::BeginTurn { player, undo } => {
                state.require_player(*player, "BeginTurn")?;
                *undo = Some(BeginTurnUndo {
                    prev_active: state.active_player_index,
                    prev_turn_number: state.turn_number,
                });
                state.active_player_index = *player as usize;
                state.turn_number = state.turn_number.wrapping_add(1);
                Ok(Vec::new())
            }
            Action::EndTurn { player, undo } => {
                state.require_player(*player, "EndTurn")?;
                if state.active_player_index != *player as usize {
                    return Err(DomainError::validation(
                        ValidationKind::OutOfTurn,
                        format!("player {player} cannot end a turn they do not hold"),
                    ));
                }
                let children = end_turn_children(state, *player);
                *undo = Some(());
                Ok(children)
            }
            Action::DrawUp { player, undo } => {
                state.require_player(*player, "DrawUp")?;
                let hand_len = state.players[*player as usize].hand.len();
                let need = HAND_LIMIT.saturating_sub(hand_len);
                let drawn = state.card_deck.draw_up_to(need);
                state.players[*player as usize]
                    .hand
                    .extend(drawn.iter().copied());
                *undo = Some(drawn);
                Ok(Vec::new())
            }
            Action::ChangeSeason {
                actor,
                season,
                field,
                lock_illimat,
                undo,
            } => {
                GameState::require_field(*field, "ChangeSeason")?;
                let prev_rotation = state.rotation;
                if state.illimat_lockers.is_empty() {
                    state.rotation = rotation_for(*field, *season);
                }
                let locked = *lock_illimat && state.illimat_lockers.insert(*actor);
                *undo = Some(ChangeSeasonUndo {
                    prev_rotation,
                    locked,
                });
                Ok(Vec::new())
            }
            Action::Sow {
                actor,
                field,
                card,
                undo,
            } => {
                GameState::require_field(*field, "Sow")?;
                require_turn_of(state, *actor)?;
                let season = state.season_of(*field);
                if !season.allows_sow() && !state.fields[*field as usize].ignore_season {
                    return Err(DomainError::validation(
                        ValidationKind::SeasonRestriction,
                        format!("cannot sow during {season}"),
                    ));
                }
                let hand_pos = hand_position(state, *actor, *card)?;
                let prev_rotation = state.rotation;
                let hand_card = state.players[*actor as usize].hand.remove(hand_pos);
                let pile = state.fields[*field as usize].add_loose_pile(vec![hand_card.revealed()]);
                maybe_rotate_for_face_card(state, *field, *card);
                *undo = Some(SowUndo {
                    hand_pos,
                    hand_card,
                    pile,
                    prev_rotation,
                });
                Ok(Vec::new())
            }
            Action::Harvest {
                actor,
                field,
                card,
                value,
                targets,
                undo,
            } => {
                GameState::require_field(*field, "Harvest")?;
                require_turn_of(state, *actor)?;
                let field_index = *field as usize;
                let season = state.season_of(*field);
                if !season.allows_harvest() && !state.fields[field_index].ignore_season {
                    return Err(DomainError::validation(
                        ValidationKind::SeasonRestriction,
                        format!("cannot harvest during {season}"),
                    ));
                }
                if !card.rank.values().iter().any(|&v| u16::from(v) == *value) {
                    return Err(DomainError::validation(
                        ValidationKind::ValueMismatch,
                        format!("{card} cannot be played at value {value}"),
                    ));
                }
                if targets.is_empty() {
                    return Err(DomainError::validation(
                        ValidationKind::EmptyTargets,
                        "a harvest must collect at least one pile",
                    ));
                }
                let mut chosen = targets.clone();
                chosen.sort_unstable();
                if !state.fields[field_index].index().contains_set(*value, &chosen) {
                    return Err(DomainError::validation(
                        ValidationKind::NoSuchCombination,
                        format!("selected piles cannot sum to {value}"),
                    ));
                }
                for &id in &chosen {
                    let pile = state.fields[field_index].pile(id).ok_or_else(|| {
                        DomainError::structural(
                            StructuralKind::PileNotFound,
                            format!("{id} indexed but missing"),
                        )
                    })?;
                    if pile.is_same_turn_stockpile(state.turn_number) {
                        return Err(DomainError::validation(
                            ValidationKind::SameTurnStockpile,
                            "a stockpile cannot be harvested the turn it was built",
                        ));
                    }
                }
                let collected: usize = chosen
                    .iter()
                    .filter_map(|&id| state.fields[field_index].pile(id))
                    .map(Pile::card_count)
                    .sum();
                if let Some(max) = state.fields[field_index].harvest_card_max {
                    if collected > usize::from(max) {
                        return Err(DomainError::validation(
                            ValidationKind::HarvestLimitExceeded,
                            format!("harvest of {collected} cards exceeds the limit of {max}"),
                        ));
                    }
                }
                let hand_pos = hand_position(state, *actor, *card)?;

                // Validation done; mutate.
                let prev_rotation = state.rotation;
                let okus_was_available = state.okus_on_illimat().is_some();
                let hand_card = state.players[*actor as usize].hand.remove(hand_pos);
                let harvest_len_before = state.players[*actor as usize].harvest.len();
                state.players[*actor as usize].harvest.push(hand_card.revealed());

                // Remove back-to-front so recorded positions stay valid,
                // then keep them ascending for reinsertion and card order.
                let mut positions: Vec<usize> = chosen
                    .iter()
                    .map(|&id| {
                        state.fields[field_index]
                            .position_of(id)
                            .expect("existence checked above")
                    })
                    .collect();
                positions.sort_unstable_by(|a, b| b.cmp(a));
                let mut removed: Vec<(usize, Pile)> = Vec::with_capacity(positions.len());
                for position in positions {
                    let id = state.fields[field_index].piles()[position].id;
                    removed.push(state.fields[field_index].remove_pile(id)?);
                }
                removed.reverse();
                for (_, pile) in &removed {
                    state.players[*actor as usize]
                        .harvest
                        .extend(pile.cards.iter().copied());
                }

                maybe_rotate_for_face_card(state, *field, *card);

                let children = if state.fields[field_index].is_cleared() {
                    field_cleared_children(state, *actor, *field, okus_was_available)
                } else {
                    Vec::new()
                };

                *undo = Some(HarvestUndo {
                    hand_pos,
                    hand_card,
                    removed,
                    harvest_len_before,
                    prev_rotation,
                });
                Ok(children)
            }
            Action::Stockpile {
                actor,
                field,
                card,
                target,
                value,
                undo,
            } => {
                GameState::require_field(*field, "Stockpile")?;
                require_turn_of(state, *actor)?;
                let field_index = *field as usize;
                let season = state.season_of(*field);
                if !season.allows_stockpile() && !state.fields[field_index].ignore_season {
                    return Err(DomainError::validation(
                        ValidationKind::SeasonRestriction,
                        format!("cannot stockpile during {season}"),
                    ));
                }
                let target_pile = state.fields[field_index].pile(*target).ok_or_else(|| {
                    DomainError::structural(
                        StructuralKind::PileNotFound,
                        format!("{target} is not on the field"),
                    )
                })?;
                let card_values: Vec<u16> =
                    card.rank.values().iter().map(|&v| u16::from(v)).collect();
                let lists = [card_values, target_pile.values()];
                if !value_sums(&lists).any(|sum| sum == u16::from(*value)) {
                    return Err(DomainError::validation(
                        ValidationKind::ValueMismatch,
                        format!("{card} plus {target} cannot total {value}"),
                    ));
                }
                let hand_pos = hand_position(state, *actor, *card)?;
                let holds_harvester = state.players[*actor as usize]
                    .hand
                    .iter()
                    .enumerate()
                    .any(|(i, c)| i != hand_pos && c.rank.values().contains(value));
                if !holds_harvester {
                    return Err(DomainError::validation(
                        ValidationKind::NoMatchingHandCard,
                        format!("no remaining hand card can harvest a stockpile of {value}"),
                    ));
                }

                let prev_rotation = state.rotation;
                let hand_card = state.players[*actor as usize].hand.remove(hand_pos);
                let (target_pos, target_pile) = state.fields[field_index].remove_pile(*target)?;
                let mut cards = Vec::with_capacity(1 + target_pile.cards.len());
                cards.push(hand_card.revealed());
                cards.extend(target_pile.cards.iter().copied());
                let pile =
                    state.fields[field_index].add_stockpile(cards, *value, state.turn_number);
                maybe_rotate_for_face_card(state, *field, *card);
                *undo = Some(StockpileUndo {
                    hand_pos,
                    hand_card,
                    target_pos,
                    target_pile,
                    pile,
                    prev_rotation,
                });
                Ok(Vec::new())
            }
            Action::StealOkus {
                actor,
                victim,
                undo,
            } => {
                state.require_player(*actor, "StealOkus")?;
                state.require_player(*victim, "StealOkus")?;
                if actor == victim {
                    return Err(DomainError::validation(
                        ValidationKind::Other("SelfSteal".into()),
                        "cannot steal from yourself",
                    ));
                }
                let okus = state
                    .okus_held_by(*victim)
                    .into_iter()
                    .next()
                    .ok_or_else(|| {
                        DomainError::structural(
                            StructuralKind::OkusNotHeld,
                            format!("player {victim} holds no okus"),
                        )
                    })?;
                state.okus[okus as usize] = OkusPosition::WithPlayer(*actor);
                *undo = Some(okus);
                Ok(Vec::new())
            }
            Action::ExchangeCard {
                actor,
                field,
                hand_card,
                pile,
                undo,
            } => {
                GameState::require_field(*field, "ExchangeCard")?;
                require_turn_of(state, *actor)?;
                let field_index = *field as usize;
                let target = state.fields[field_index].pile(*pile).ok_or_else(|| {
                    DomainError::structural(
                        StructuralKind::PileNotFound,
                        format!("{pile} is not on the field"),
                    )
                })?;
                let exchangeable =
                    matches!(target.kind, PileKind::Loose) && target.cards.len() == 1;
                if !exchangeable {
                    return Err(DomainError::validation(
                        ValidationKind::InvalidExchange,
                        "only a single loose card can be exchanged",
                    ));
                }
                let field_card = target.cards[0];
                let hand_pos = hand_position(state, *actor, *hand_card)?;

                let taken = state.players[*actor as usize].hand[hand_pos];
                let (pile_pos, old_pile) = state.fields[field_index].remove_pile(*pile)?;
                let new_pile =
                    state.fields[field_index].add_loose_pile_at(pile_pos, vec![taken.revealed()]);
                state.players[*actor as usize].hand[hand_pos] = field_card.concealed();
                *undo = Some(ExchangeUndo {
                    hand_pos,
                    hand_card: taken,
                    pile_pos,
                    old_pile,
                    new_pile,
                });
                Ok(Vec::new())
            }
            Action::CollectOkus { player, undo } => {
                state.require_player(*player, "CollectOkus")?;
                let collected = state.okus_on_illimat();
                if let Some(okus) = collected {
                    state.okus[okus as usize] = OkusPosition::WithPlayer(*player);
                }
                *undo = Some(CollectOkusUndo { collected });
                Ok(Vec::new())
            }
            Action::RevealLuminary { actor, field, undo } => {
                GameState::require_field(*field, "RevealLuminary")?;
                let field_index = *field as usize;
                let LuminarySlot::FaceDown(card) = state.fields[field_index].luminary else {
                    return Err(DomainError::structural(
                        StructuralKind::LuminarySlotMismatch,
                        format!("field {field} has no face-down luminary"),
                    ));
                };
                let prev_override = state.season_overrides[field_index];
                let prev_ignore_season = state.fields[field_index].ignore_season;
                state.fields[field_index].luminary = LuminarySlot::FaceUp(card);
                let children = apply_reveal_effect(state, *actor, *field, card);
                *undo = Some(RevealLuminaryUndo {
                    card,
                    prev_override,
                    prev_ignore_season,
                });
                Ok(children)
            }
            Action::ClaimLuminary { player, field, undo } => {
                state.require_player(*player, "ClaimLuminary")?;
                GameState::require_field(*field, "ClaimLuminary")?;
                let field_index = *field as usize;
                let LuminarySlot::FaceUp(card) = state.fields[field_index].luminary else {
                    return Err(DomainError::structural(
                        StructuralKind::LuminarySlotMismatch,
                        format!("field {field} has no face-up luminary to claim"),
                    ));
                };
                state.fields[field_index].luminary = LuminarySlot::Claimed(card, *player);
                state.players[*player as usize].luminaries.push(card);
                *undo = Some(ClaimLuminaryUndo { card });
                Ok(Vec::new())
            }
            Action::ScoreRound { undo, .. } => {
                let prev_scores = state.players.iter().map(|p| p.score).collect();
                let round = scoring::score_round(state);
                scoring::apply_round_scoring(state, &round);
                tracing::info!(
                    bumper_crop = ?round.bumper_crop_winner,
                    sunkissed = ?round.sunkissed_winner,
                    frostbit = ?round.frostbit_players,
                    "round scored"
                );
                *undo = Some(ScoreRoundUndo { prev_scores });
                Ok(Vec::new())
            }
        }
    }

    /// Exactly invert the observable effects of `perform`. Must only be
    /// called on the most recently performed action (strict LIFO).
    pub fn unwind(&mut self, state: &mut GameState) -> Result<(), DomainError> {
        if !self.is_performed() {
            return Err(DomainError::invariant(
                InvariantKind::NeverPerformed,
                format!("{} was never performed", self.kind()),
            ));
        }
        match self {
            Action::InitialDeal { undo, .. } | Action::EndTurn { undo, .. } => {
                // Composites mutate nothing; their children unwind themselves.
                *undo = None;
                Ok(())
            }
            Action::SeedField { field, undo, .. } => {
                let data = undo.take().expect("performed checked above");
                let field_state = &mut state.fields[*field as usize];
                for &pile in data.piles.iter().rev() {
                    field_state.unadd_pile(pile)?;
                }
                state.card_deck.put_back_front(data.drawn);
                Ok(())
            }
            Action::DealHand { player, undo, .. } => {
                let drawn = undo.take().expect("performed checked above");
                remove_hand_tail(state, *player, &drawn)?;
                state.card_deck.put_back_front(drawn);
                Ok(())
            }
            Action::PlaceOkus { okus, undo, .. } => {
                let prev = undo.take().expect("performed checked above");
                state.okus[*okus as usize] = prev;
                Ok(())
            }
            Action::DealLuminary { field, undo, .. } => {
                let data = undo.take().expect("performed checked above");
                if let Some(card) = data.dealt {
                    let slot = &mut state.fields[*field as usize].luminary;
                    if *slot != LuminarySlot::FaceDown(card) {
                        return Err(DomainError::structural(
                            StructuralKind::LuminarySlotMismatch,
                            format!("field {field} no longer holds {card} face down"),
                        ));
                    }
                    *slot = LuminarySlot::Empty;
                    state.luminary_deck.put_back_front(vec![card]);
                }
                Ok(())
            }
            Action::BeginTurn { undo, .. } => {
                let data = undo.take().expect("performed checked above");
                state.active_player_index = data.prev_active;
                state.turn_number = data.prev_turn_number;
                Ok(())
            }
            Action::DrawUp { player, undo } => {
                let drawn = undo.take().expect("performed checked above");
                remove_hand_tail(state, *player, &drawn)?;
                state.card_deck.put_back_front(drawn);
                Ok(())
            }
            Action::ChangeSeason { actor, undo, .. } => {
                let data = undo.take().expect("performed checked above");
                if data.locked {
                    state.illimat_lockers.remove(actor);
                }
                if state.illimat_lockers.is_empty() && state.rotation != data.prev_rotation {
                    state.rotation = data.prev_rotation;
                }
                Ok(())
            }
            Action::Sow {
                actor, field, undo, ..
            } => {
                let data = undo.take().expect("performed checked above");
                state.rotation = data.prev_rotation;
                state.fields[*field as usize].unadd_pile(data.pile)?;
                state.players[*actor as usize]
                    .hand
                    .insert(data.hand_pos, data.hand_card);
                Ok(())
            }
            Action::Harvest {
                actor, field, undo, ..
            } => {
                let data = undo.take().expect("performed checked above");
                state.rotation = data.prev_rotation;
                for (position, pile) in data.removed {
                    state.fields[*field as usize].restore_pile(position, pile);
                }
                state.players[*actor as usize]
                    .harvest
                    .truncate(data.harvest_len_before);
                state.players[*actor as usize]
                    .hand
                    .insert(data.hand_pos, data.hand_card);
                Ok(())
            }
            Action::Stockpile {
                actor, field, undo, ..
            } => {
                let data = undo.take().expect("performed checked above");
                state.rotation = data.prev_rotation;
                state.fields[*field as usize].unadd_pile(data.pile)?;
                state.fields[*field as usize].restore_pile(data.target_pos, data.target_pile);
                state.players[*actor as usize]
                    .hand
                    .insert(data.hand_pos, data.hand_card);
                Ok(())
            }
            Action::StealOkus { victim, undo, .. } => {
                let okus = undo.take().expect("performed checked above");
                state.okus[okus as usize] = OkusPosition::WithPlayer(*victim);
                Ok(())
            }
            Action::ExchangeCard {
                actor, field, undo, ..
            } => {
                let data = undo.take().expect("performed checked above");
                state.fields[*field as usize].unadd_pile(data.new_pile)?;
                state.fields[*field as usize].restore_pile(data.pile_pos, data.old_pile);
                state.players[*actor as usize].hand[data.hand_pos] = data.hand_card;
                Ok(())
            }
            Action::CollectOkus { undo, .. } => {
                let data = undo.take().expect("performed checked above");
                if let Some(okus) = data.collected {
                    state.okus[okus as usize] = OkusPosition::OnIllimat;
                }
                Ok(())
            }
            Action::RevealLuminary { field, undo, .. } => {
                let data = undo.take().expect("performed checked above");
                let field_index = *field as usize;
                if state.fields[field_index].luminary != LuminarySlot::FaceUp(data.card) {
                    return Err(DomainError::structural(
                        StructuralKind::LuminarySlotMismatch,
                        format!("field {field} no longer shows {} face up", data.card),
                    ));
                }
                state.fields[field_index].luminary = LuminarySlot::FaceDown(data.card);
                state.season_overrides[field_index] = data.prev_override;
                state.fields[field_index].ignore_season = data.prev_ignore_season;
                Ok(())
            }
            Action::ClaimLuminary { player, field, undo } => {
                let data = undo.take().expect("performed checked above");
                let field_index = *field as usize;
                let luminaries = &mut state.players[*player as usize].luminaries;
                if luminaries.last() != Some(&data.card) {
                    return Err(DomainError::structural(
                        StructuralKind::LuminarySlotMismatch,
                        format!("player {player} did not claim {} last", data.card),
                    ));
                }
                luminaries.pop();
                state.fields[field_index].luminary = LuminarySlot::FaceUp(data.card);
                Ok(())
            }
            Action::ScoreRound { undo, .. } => {
                let data = undo.take().expect("performed checked above");
                for (player, prev) in state.players.iter_mut().zip(data.prev_scores.iter()) {
                    player.score = *prev;
                }
                Ok(())
            }
        }
    }
}

/// The initial deal's deterministic child sequence: seed all four fields,
/// deal hands starting left of dealer (short hand) with the dealer last,
/// place one okus per player, deal one luminary per field.
fn initial_deal_children(
    state: &GameState,
    dealer: PlayerId,
) -> Result<Vec<Action>, DomainError> {
    state.require_player(dealer, "InitialDeal")?;
    let player_count = state.player_count();
    let mut children = Vec::with_capacity(FIELDS + player_count * 2 + FIELDS);
    for field in 0..FIELDS as FieldId {
        children.push(Action::SeedField {
            actor: dealer,
            field,
            count: FIELD_SEED_CARDS,
            undo: None,
        });
    }
    for step in 1..=player_count {
        let player = seat_offset(dealer, step as i8, player_count);
        let count = if step == 1 { SHORT_HAND } else { HAND_LIMIT };
        children.push(Action::DealHand {
            actor: dealer,
            player,
            count,
            undo: None,
        });
    }
    for index in 0..player_count {
        children.push(Action::PlaceOkus {
            actor: dealer,
            okus: OkusId::ALL[index],
            undo: None,
        });
    }
    for field in 0..FIELDS as FieldId {
        children.push(Action::DealLuminary {
            actor: dealer,
            field,
            undo: None,
        });
    }
    Ok(children)
}

/// The turn handoff: the ending player refills their hand, then the next
/// seat clockwise still holding cards begins; with nobody left to act the
/// round moves to scoring.
fn end_turn_children(state: &GameState, player: PlayerId) -> Vec<Action> {
    let player_count = state.player_count();
    let current = state.active_player_index as PlayerId;
    let next = (1..=player_count)
        .map(|step| seat_offset(current, step as i8, player_count))
        .find(|&candidate| !state.players[candidate as usize].hand.is_empty());
    let follow_up = match next {
        Some(candidate) => Action::BeginTurn {
            player: candidate,
            undo: None,
        },
        None => Action::ScoreRound {
            actor: player,
            undo: None,
        },
    };
    vec![
        Action::DrawUp {
            player,
            undo: None,
        },
        follow_up,
    ]
}

/// Clearing a field earns an okus, flips or hands over the luminary, and —
/// when either was on offer — reseeds the field from the deck.
fn field_cleared_children(
    state: &GameState,
    player: PlayerId,
    field: FieldId,
    okus_was_available: bool,
) -> Vec<Action> {
    let mut children = Vec::new();
    if okus_was_available {
        children.push(Action::CollectOkus {
            player,
            undo: None,
        });
    }
    let slot = state.fields[field as usize].luminary;
    let revealing = slot.is_face_down();
    if revealing {
        children.push(Action::RevealLuminary {
            actor: player,
            field,
            undo: None,
        });
    } else if slot.can_be_claimed() {
        children.push(Action::ClaimLuminary {
            player,
            field,
            undo: None,
        });
    }
    let should_reseed = revealing || okus_was_available;
    if should_reseed && state.card_deck.len() >= FIELD_SEED_CARDS {
        children.push(Action::SeedField {
            actor: player,
            field,
            count: FIELD_SEED_CARDS,
            undo: None,
        });
    }
    children
}

/// Structural reveal effects. The Forest Queen pins her field to Summer,
/// The Maiden exempts hers from season restrictions, The River floods its
/// field with six more cards. The remaining core luminaries have no
/// board-structural effect at reveal time.
fn apply_reveal_effect(
    state: &mut GameState,
    actor: PlayerId,
    field: FieldId,
    card: LuminaryCard,
) -> Vec<Action> {
    match card {
        LuminaryCard::TheForestQueen => {
            state.season_overrides[field as usize] = Some(Season::Summer);
            Vec::new()
        }
        LuminaryCard::TheMaiden => {
            state.fields[field as usize].ignore_season = true;
            Vec::new()
        }
        LuminaryCard::TheRiver => vec![Action::SeedField {
            actor,
            field,
            count: RIVER_SEED_CARDS,
            undo: None,
        }],
        _ => Vec::new(),
    }
}

/// Face cards realign the Illimat so the played field enters the card's
/// season — unless the Illimat is locked, and never for Stars.
fn maybe_rotate_for_face_card(state: &mut GameState, field: FieldId, card: Card) {
    if !card.rank.is_face() || !state.illimat_lockers.is_empty() {
        return;
    }
    if let Some(season) = Season::for_suit(card.suit) {
        state.rotation = rotation_for(field, season);
    }
}

fn require_turn_of(state: &GameState, actor: PlayerId) -> Result<(), DomainError> {
    state.require_player(actor, "turn check")?;
    if state.active_player_index != actor as usize {
        return Err(DomainError::validation(
            ValidationKind::OutOfTurn,
            format!("player {actor} is not the active player"),
        ));
    }
    Ok(())
}

fn hand_position(state: &GameState, player: PlayerId, card: Card) -> Result<usize, DomainError> {
    state.players[player as usize]
        .hand
        .iter()
        .position(|&c| c == card)
        .ok_or_else(|| {
            DomainError::structural(
                StructuralKind::CardNotInHand,
                format!("player {player} does not hold {card}"),
            )
        })
}

/// Strict-LIFO helper: the cards appended by a draw must still form the
/// hand's tail when that draw unwinds.
fn remove_hand_tail(
    state: &mut GameState,
    player: PlayerId,
    drawn: &[Card],
) -> Result<(), DomainError> {
    let hand = &mut state.players[player as usize].hand;
    if hand.len() < drawn.len() || hand[hand.len() - drawn.len()..] != drawn[..] {
        return Err(DomainError::structural(
            StructuralKind::CardNotInHand,
            format!("hand of player {player} no longer ends with the drawn cards"),
        ));
    }
    let new_len = hand.len() - drawn.len();
    hand.truncate(new_len);
    Ok(())
}
