//! IRC line classification and framing for Twitch chat.
//!
//! Pure functions over single IRC lines — no I/O, no connection state.
//! The reader task calls [`parse_line`] once per frame and acts on the
//! returned [`IrcEvent`].

/// Classification of one incoming IRC line
#[derive(Debug, PartialEq, Eq)]
pub enum IrcEvent {
    /// Server keepalive; must be answered with [`pong`] or the server
    /// drops the connection
    Ping { token: String },
    /// A chat message in a channel
    Privmsg {
        nick: String,
        channel: String,
        text: String,
    },
    /// Anything else (numerics, JOIN echoes, NOTICEs, ...)
    Other,
}

/// Classify a single IRC line.
///
/// Handles the subset of the protocol an anonymous reader sees:
/// `PING` keepalives and `:nick!user@host PRIVMSG #channel :text`
/// messages. IRCv3 tag prefixes are tolerated and skipped.
pub fn parse_line(line: &str) -> IrcEvent {
    let line = line.trim_end_matches(['\r', '\n']);

    // Skip an IRCv3 tag block if the server sends one
    let line = if line.starts_with('@') {
        match line.split_once(' ') {
            Some((_, rest)) => rest,
            None => return IrcEvent::Other,
        }
    } else {
        line
    };

    if let Some(rest) = line.strip_prefix("PING") {
        let token = rest.trim_start().trim_start_matches(':').to_string();
        return IrcEvent::Ping { token };
    }

    let Some(rest) = line.strip_prefix(':') else {
        return IrcEvent::Other;
    };
    let Some((prefix, rest)) = rest.split_once(' ') else {
        return IrcEvent::Other;
    };
    let Some((command, params)) = rest.split_once(' ') else {
        return IrcEvent::Other;
    };
    if command != "PRIVMSG" {
        return IrcEvent::Other;
    }
    let Some((target, text)) = params.split_once(" :") else {
        return IrcEvent::Other;
    };

    let nick = prefix.split('!').next().unwrap_or(prefix).to_string();
    IrcEvent::Privmsg {
        nick,
        channel: target.trim_start_matches('#').to_string(),
        text: text.to_string(),
    }
}

/// Guest nick for anonymous chat access
pub fn anonymous_nick() -> String {
    format!("justinfan{}", std::process::id())
}

pub fn nick(name: &str) -> String {
    format!("NICK {name}")
}

pub fn join(channel: &str) -> String {
    format!("JOIN #{channel}")
}

pub fn part(channel: &str) -> String {
    format!("PART #{channel}")
}

pub fn pong(token: &str) -> String {
    if token.is_empty() {
        "PONG".to_string()
    } else {
        format!("PONG :{token}")
    }
}
