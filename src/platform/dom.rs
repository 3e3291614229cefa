//! Word display, on-screen keyboard and scoreboard

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlButtonElement};

use crate::consts::ALPHABET;
use crate::game::Session;

/// DOM nodes the game writes to every update
pub struct Hud {
    document: Document,
    word: Element,
    keys: Vec<(char, HtmlButtonElement)>,
    wins: Element,
    losses: Element,
}

fn by_id(document: &Document, id: &str) -> Result<Element, JsValue> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("missing #{id}")))
}

impl Hud {
    /// Find the containers and fill `#keyboard` with one button per letter
    pub fn build(document: &Document) -> Result<Self, JsValue> {
        let word = by_id(document, "word")?;
        let keyboard = by_id(document, "keyboard")?;
        let wins = by_id(document, "wins")?;
        let losses = by_id(document, "losses")?;

        keyboard.set_inner_html("");
        let mut keys = Vec::with_capacity(ALPHABET.len());
        for letter in ALPHABET.chars() {
            let button: HtmlButtonElement = document.create_element("button")?.dyn_into()?;
            button.set_class_name("key");
            button.set_text_content(Some(&letter.to_string()));
            button.set_attribute("data-letter", &letter.to_string())?;
            keyboard.append_child(&button)?;
            keys.push((letter, button));
        }

        Ok(Self {
            document: document.clone(),
            word,
            keys,
            wins,
            losses,
        })
    }

    pub fn keys(&self) -> &[(char, HtmlButtonElement)] {
        &self.keys
    }

    /// Mirror the session into the page
    pub fn update(&self, session: &Session) -> Result<(), JsValue> {
        self.word.set_inner_html("");
        for slot in session.word_status() {
            let cell = self.document.create_element("div")?;
            match slot {
                Some(letter) => {
                    cell.set_class_name("letter revealed");
                    cell.set_text_content(Some(&letter.to_string()));
                }
                None => {
                    cell.set_class_name("letter hidden");
                    cell.set_text_content(Some("?"));
                }
            }
            self.word.append_child(&cell)?;
        }

        for ((_, button), (_, used)) in self.keys.iter().zip(session.keyboard()) {
            button.set_disabled(used);
        }

        let score = session.score();
        self.wins.set_text_content(Some(&score.wins.to_string()));
        self.losses.set_text_content(Some(&score.losses.to_string()));
        Ok(())
    }
}
