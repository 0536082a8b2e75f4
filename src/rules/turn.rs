//! Seasons, turn rotation and ending a player's game.

use log::info;

use crate::core::log::log_parts;
use crate::core::{
    ContextTag, EntityRef, GameInput, GameState, Prompt, Purpose, SelectCards, SelectOptionGeneric, Season,
};
use crate::effects::{validate_choice, validate_selection, Playable};
use crate::error::{ensure, GameError, GameResult};
use crate::expansions::VisitorName;
use crate::player::PlayerStatus;

/// Meadow cards a player may take when Summer starts.
const SUMMER_MEADOW_PICKS: usize = 2;

const DECLINE: &str = "Decline";

// === Seasons ===

pub(crate) fn can_prepare_for_season_check(state: &GameState) -> GameResult<()> {
    let player = state.active();
    ensure!(!player.has_ended(), "You have already ended your game");
    ensure!(player.current_season != Season::Autumn, "Cannot prepare for season in Autumn");
    ensure!(player.num_available_workers() == 0, "Still have workers available to place");
    Ok(())
}

/// Recall workers, move to the next season and run its effect.
pub(crate) fn prepare_for_season(state: &mut GameState) -> GameResult<()> {
    let player_id = state.active_player_id();
    state.recall_workers(player_id)?;

    let season = state
        .active()
        .current_season
        .next()
        .ok_or_else(|| GameError::validation("Cannot prepare for season in Autumn"))?;
    let player = state.player_mut(player_id);
    player.current_season = season;
    player.num_workers += season.workers_gained();
    state.log_plain(log_parts![player_id, format!(" took back their workers and prepared for {season}.")]);
    info!("{player_id} entered {season}");

    if season.has_production() {
        state.log_plain(log_parts![player_id, " activated PRODUCTION."]);
        crate::cards::activate_all_production(state, player_id)?;
    }

    if state.options().newleaf.visitors {
        let revealed: Vec<String> = state
            .visitors()
            .map(|v| v.revealed().iter().flatten().map(ToString::to_string).collect())
            .unwrap_or_default();
        if !revealed.is_empty() {
            let mut options = revealed;
            options.push(DECLINE.to_string());
            state.push_pending(GameInput::SelectOptionGeneric(SelectOptionGeneric {
                prompt: Prompt::new(ContextTag::new(EntityRef::Season(season), Purpose::Invite), "Invite a visitor"),
                options,
                selected_option: None,
            }))?;
        }
    }

    if season == Season::Summer {
        let max = SUMMER_MEADOW_PICKS.min(state.active().hand_space());
        if max > 0 && !state.meadow().is_empty() {
            state.push_pending(GameInput::SelectCards(SelectCards {
                prompt: Prompt::new(
                    ContextTag::new(EntityRef::Season(season), Purpose::TakeCards),
                    format!("Select up to {max} CARD from the Meadow"),
                ),
                card_options: state.meadow().to_vec(),
                min_to_select: 0,
                max_to_select: max,
                selected_cards: vec![],
            }))?;
        }
    }
    Ok(())
}

/// Continue a season decision.
pub(crate) fn resolve_season(
    state: &mut GameState,
    season: Season,
    input: &GameInput,
    purpose: Purpose,
) -> GameResult<()> {
    let player = state.active_player_id();
    match (purpose, input) {
        (Purpose::TakeCards, GameInput::SelectCards(select)) => {
            validate_selection(&select.card_options, &select.selected_cards, select.min_to_select, select.max_to_select)?;
            ensure!(
                select.selected_cards.len() <= state.active().hand_space(),
                "Not enough space in your hand"
            );
            for &card in &select.selected_cards {
                state.take_from_meadow(card)?;
                state.player_mut(player).add_card_to_hand(card);
            }
            state.replenish_meadow();
            let n = select.selected_cards.len();
            state.log_plain(log_parts![player, format!(" took {n} CARD from the Meadow for {season}.")]);
            Ok(())
        }
        (Purpose::Invite, GameInput::SelectOptionGeneric(select)) => {
            let choice = validate_choice(&select.options, select.selected_option.as_ref(), true)?
                .ok_or_else(|| GameError::validation("Please make a selection"))?;
            if choice == DECLINE {
                state.log_plain(log_parts![player, " declined to invite a visitor."]);
                return Ok(());
            }
            let visitor = VisitorName::ALL
                .into_iter()
                .find(|v| v.to_string() == choice)
                .ok_or_else(|| GameError::validation(format!("Unknown visitor {choice}")))?;
            visitor.play(state, input)
        }
        _ => Err(GameError::invariant(format!("{season} cannot handle {:?}", input.kind()))),
    }
}

// === Ending ===

/// A player may end in Autumn once their workers are out, or whenever they
/// have no other move.
pub(crate) fn can_end_check(state: &GameState) -> GameResult<()> {
    let player = state.active();
    ensure!(!player.has_ended(), "You have already ended your game");
    let out_of_workers = player.current_season == Season::Autumn && player.num_available_workers() == 0;
    ensure!(
        out_of_workers || !state.base_inputs().iter().any(|i| !i.retains_turn()),
        "Cannot end your game while you still have moves"
    );
    Ok(())
}

pub(crate) fn end_game_for_player(state: &mut GameState) -> GameResult<()> {
    let player = state.active_player_id();
    state.player_mut(player).status = PlayerStatus::GameEnded;
    state.log_plain(log_parts![player, " ended their game."]);
    info!("{player} ended their game");
    Ok(())
}

/// Pass the turn to the next seat still playing.
pub(crate) fn advance_turn(state: &mut GameState) {
    let count = state.player_count();
    let mut seat = state.active_player;
    for _ in 0..count {
        seat = seat.next(count);
        if !state.player(seat).has_ended() {
            state.active_player = seat;
            return;
        }
    }
}
