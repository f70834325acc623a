use std::collections::HashMap;

use crate::games::pokemon::constants::{set_color, LIMITLESS_CDN_BASE, LIMITLESS_DECK_BASE};
use crate::models::meta::{DeckAggregate, MainCard};
use crate::models::tournament::{Card, Decklist, Standing};

pub const IMAGE_SIZE_SM: &str = "SM";
pub const IMAGE_SIZE_LG: &str = "LG";

/// Pick the card that represents a deck: the first "ex" Pokémon if there is
/// one, otherwise the first Pokémon in the list.
pub fn extract_main_card(decklist: Option<&Decklist>) -> Option<MainCard> {
    let decklist = decklist?;
    if decklist.pokemon.is_empty() {
        return None;
    }

    let card = decklist
        .pokemon
        .iter()
        .find(|card| card.name.contains("ex"))
        .unwrap_or(&decklist.pokemon[0]);

    Some(MainCard {
        name: card.name.clone(),
        set: card.set.clone(),
        number: card.number.clone(),
    })
}

/// CDN image URL for a card. No API call needed, the URL is fully
/// determined by set code, zero-padded card number and size token.
pub fn card_image_url(card_set: &str, card_number: &str, size: &str) -> Option<String> {
    if card_set.is_empty() || card_number.is_empty() {
        return None;
    }
    // Zero-pad to 3 digits (MEG_086, not MEG_86)
    Some(format!(
        "{}/{}/{}_{:0>3}_R_EN_{}.png",
        LIMITLESS_CDN_BASE, card_set, card_set, card_number, size
    ))
}

pub fn deck_url(deck_id: &str) -> String {
    format!("{}/{}", LIMITLESS_DECK_BASE, deck_id)
}

fn add_images(cards: &mut [Card]) {
    for card in cards {
        if let (Some(set), Some(number)) = (card.set.as_deref(), card.number.as_deref()) {
            card.image = card_image_url(set, number, IMAGE_SIZE_SM);
        }
    }
}

/// Attach CDN image URLs to every card in the list.
pub fn enhance_decklist_images(mut decklist: Decklist) -> Decklist {
    add_images(&mut decklist.pokemon);
    add_images(&mut decklist.trainer);
    add_images(&mut decklist.energy);
    decklist
}

/// Group standings by deck name and count appearances. The representative
/// main card, deck id and icons come from the first standing seen for each
/// deck. Output is sorted by count descending, ties keeping first-seen order.
pub fn aggregate_decks(standings: &[Standing]) -> Vec<DeckAggregate> {
    let mut decks: Vec<DeckAggregate> = Vec::new();
    let mut index_by_name: HashMap<String, usize> = HashMap::new();

    for standing in standings {
        let Some(deck) = standing.deck.as_ref() else {
            continue;
        };
        let Some(deck_name) = deck.name.as_deref() else {
            continue;
        };

        match index_by_name.get(deck_name) {
            Some(&i) => decks[i].count += 1,
            None => {
                index_by_name.insert(deck_name.to_string(), decks.len());
                decks.push(DeckAggregate {
                    name: deck_name.to_string(),
                    count: 1,
                    main_card: extract_main_card(standing.decklist.as_ref()),
                    deck_id: deck.id.clone(),
                    icons: deck.icons.clone(),
                    set_color: None,
                    set_code: None,
                    image: None,
                    deck_url: None,
                });
            }
        }
    }

    for deck in &mut decks {
        if let Some(card) = &deck.main_card {
            deck.set_color = Some(set_color(card.set.as_deref().unwrap_or("")).to_string());
            deck.set_code = card.set.clone();
            deck.image = card
                .set
                .as_deref()
                .zip(card.number.as_deref())
                .and_then(|(set, number)| card_image_url(set, number, IMAGE_SIZE_LG));
        }
        deck.deck_url = deck.deck_id.as_deref().map(deck_url);
    }

    decks.sort_by(|a, b| b.count.cmp(&a.count));
    decks
}
