//! The mode dispatcher: one key event at a time, in arrival order

use std::collections::HashMap;
use std::sync::Arc;

use crate::executor::Executor;
use crate::tracing::DispatchSnapshot;
use crate::keymap::{
    parse, Key, KeyContext, KeyEvent, KeyMap, KeymapCache, KeymapConfig, KeymapError, MapTarget,
    ParserResponse, Resolved,
};

use super::parsers::{self, GobbleState, NModeState};
use super::{Enter, Mode, ModeControl};

/// Owns the current mode, one pending-key buffer per mode, and the compiled
/// keymaps.
///
/// Nothing here is shared or locked: the caller feeds events one by one and
/// each is processed to completion, including command execution, before
/// `feed` returns.
#[derive(Debug)]
pub struct Dispatcher {
    config: KeymapConfig,
    cache: KeymapCache,
    mode: Mode,
    buffers: HashMap<Mode, Vec<Key>>,
    gobble: Option<GobbleState>,
    nmode: Option<NModeState>,
}

impl Dispatcher {
    pub fn new(config: KeymapConfig) -> Self {
        Self {
            config,
            cache: KeymapCache::new(),
            mode: Mode::Normal,
            buffers: HashMap::new(),
            gobble: None,
            nmode: None,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Switch mode directly, as an explicit mode command would.
    ///
    /// Leaving gobble or nmode drops its unfinished state.
    pub fn set_mode(&mut self, mode: Mode) {
        if mode == self.mode {
            return;
        }
        match self.mode {
            Mode::Gobble => self.gobble = None,
            Mode::NMode => self.nmode = None,
            _ => {}
        }
        self.buffers.remove(&mode);
        self.mode = mode;
    }

    pub fn config(&self) -> &KeymapConfig {
        &self.config
    }

    /// Replace the configuration and drop every compiled keymap
    pub fn set_config(&mut self, config: KeymapConfig) {
        self.config = config;
        self.cache.clear();
    }

    /// Drop the compiled keymap for one table after its config changed
    pub fn invalidate(&mut self, table: &str) {
        self.cache.invalidate(table);
    }

    /// Use a programmatically built keymap for `mode`, e.g. one with
    /// callback targets. It stays until the config is replaced or the
    /// table invalidated.
    pub fn set_keymap(&mut self, mode: Mode, keymap: KeyMap) {
        self.cache.insert(&mode.config_name(), keymap);
    }

    /// Pending keys of `mode`
    pub fn buffer(&self, mode: Mode) -> &[Key] {
        self.buffers.get(&mode).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Printable form of the active mode's pending keys, e.g. `2<C-u>`
    pub fn suffix(&self) -> String {
        self.buffer(self.mode)
            .iter()
            .map(Key::display_string)
            .collect()
    }

    /// The compiled keymap for `mode`
    pub fn keymap(&mut self, mode: Mode) -> Result<Arc<KeyMap>, KeymapError> {
        if mode == Mode::Hint {
            let config = &self.config;
            return self
                .cache
                .get_or_insert_with(&mode.config_name(), || parsers::hint_keymap(config));
        }
        self.cache.get_or_build(&mode.config_name(), &self.config)
    }

    /// Feed one host event
    pub fn feed_event(
        &mut self,
        event: &KeyEvent,
        executor: &mut dyn Executor,
    ) -> Result<ParserResponse, KeymapError> {
        self.feed(event.to_key(), event.context(), executor)
    }

    /// Feed one key.
    ///
    /// On a match the command is executed before this returns. Execution
    /// errors are logged and swallowed. A mode with no usable bindings is
    /// reported as an error; either way the dispatcher stays usable for the
    /// next key.
    pub fn feed(
        &mut self,
        key: Key,
        context: KeyContext,
        executor: &mut dyn Executor,
    ) -> Result<ParserResponse, KeymapError> {
        let before = tracing::enabled!(tracing::Level::DEBUG)
            .then(|| DispatchSnapshot::from_dispatcher(self));
        self.follow_focus(context);
        let mode = self.mode;

        // A release only matters between the keys of a sequence
        if key.keyup && self.buffer(mode).is_empty() {
            return Ok(ParserResponse::empty());
        }

        let key = self.translate(key);
        let mut keys = self.buffers.remove(&mode).unwrap_or_default();
        keys.push(key);

        let response = match self.resolve(mode, &keys) {
            Ok(response) => response,
            Err(e) => {
                tracing::error!("Failed to resolve keys in {} mode: {}", mode, e);
                return Err(e);
            }
        };
        tracing::debug!(
            "{} mode: {:?} -> {:?}",
            mode,
            keys.iter().map(Key::to_mapstr).collect::<String>(),
            response
        );

        match &response {
            ParserResponse::Matched(resolved) => self.run(resolved, executor),
            ParserResponse::Partial { keys, .. } => {
                if !keys.is_empty() {
                    self.buffers.insert(mode, keys.clone());
                }
            }
        }
        if let Some(before) = before {
            if let Some(change) = before.diff(&DispatchSnapshot::from_dispatcher(self)) {
                tracing::debug!("{}", change);
            }
        }
        Ok(response)
    }

    /// Enter or leave insert/input mode as focus moves
    fn follow_focus(&mut self, context: KeyContext) {
        let target = if !self.mode.keeps_focus_mode() {
            match (context.editable, self.mode) {
                (true, _) => Mode::Insert,
                (false, Mode::Insert) => Mode::Normal,
                (false, mode) => mode,
            }
        } else if self.mode == Mode::Input && !context.editable {
            Mode::Normal
        } else {
            self.mode
        };
        self.set_mode(target);
    }

    /// The table whose translation setting applies to the active mode
    fn table_for_keys(&self) -> String {
        match (&self.mode, &self.nmode) {
            (Mode::NMode, Some(state)) => state.mode().config_name(),
            (mode, _) => mode.config_name(),
        }
    }

    fn translate(&self, key: Key) -> Key {
        if self.config.keytranslatemap.is_empty() || !self.config.translates(&self.table_for_keys()) {
            return key;
        }
        key.translate(&self.config.keytranslatemap)
    }

    fn resolve(&mut self, mode: Mode, keys: &[Key]) -> Result<ParserResponse, KeymapError> {
        match mode {
            Mode::Hint => {
                let keymap = self.keymap(Mode::Hint)?;
                Ok(parsers::hint(keys, &keymap, self.config.hint_filter_mode()))
            }
            Mode::Gobble => {
                let Some(state) = self.gobble.as_mut() else {
                    tracing::warn!("Gobble mode entered without a command; returning to normal");
                    self.set_mode(Mode::Normal);
                    return Ok(ParserResponse::empty());
                };
                let (response, done) = state.feed(keys);
                if done {
                    self.set_mode(Mode::Normal);
                }
                Ok(response)
            }
            Mode::NMode => {
                let Some(inner) = self.nmode.as_ref().map(NModeState::mode) else {
                    tracing::warn!("nmode entered without a command; returning to normal");
                    self.set_mode(Mode::Normal);
                    return Ok(ParserResponse::empty());
                };
                let keymap = match self.keymap(inner) {
                    Ok(keymap) => keymap,
                    Err(e) => {
                        self.set_mode(Mode::Normal);
                        return Err(e);
                    }
                };
                let (response, done) = match self.nmode.as_mut() {
                    Some(state) => state.feed(keys, &keymap),
                    None => (ParserResponse::empty(), true),
                };
                if done {
                    self.set_mode(Mode::Normal);
                }
                Ok(response)
            }
            mode => {
                let keymap = self.keymap(mode)?;
                Ok(parse(keys, &keymap))
            }
        }
    }

    /// Run a resolved target and apply any mode change it requested
    fn run(&mut self, resolved: &Resolved, executor: &mut dyn Executor) {
        if let MapTarget::Callback(callback) = &resolved.value {
            if let Err(e) = callback(resolved.numeric_prefix) {
                tracing::error!("Callback failed: {:#}", e);
            }
        }
        let Some(exstr) = resolved.exstr.as_deref() else {
            return;
        };

        let mut control = ModeControl::new(self.mode);
        if let Err(e) = executor.execute(exstr, &mut control) {
            tracing::error!("Command '{}' failed: {:#}", exstr, e);
        }
        let (mode, enter) = control.into_parts();
        self.set_mode(mode);
        match enter {
            Some(Enter::Gobble(state)) => self.gobble = Some(state),
            Some(Enter::NMode(state)) => self.nmode = Some(state),
            None => {}
        }
    }
}
