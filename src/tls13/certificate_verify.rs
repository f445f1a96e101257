//! Sending and receiving the TLS 1.3 CertificateVerify message.
//!
//! One [`CertificateVerifyFlow`] handles one message: either the one the
//! local side sends, or the one it receives from the peer. The flow runs
//! at most once. Any error aborts it for good.
//!
//! Sending may be interrupted by a transport that accepts only part of the
//! body. The flow then keeps the signed body and how much of it went out,
//! and `send(.., again = true)` continues from there. The transcript is
//! signed exactly once per message.

use crate::buffer::Buf;
use crate::certificate::CertificateAuth;
use crate::io::HandshakeIo;
use crate::message::CertificateVerify;
use crate::registry;
use crate::session::{HandshakeFlag, Session};
use crate::signed;
use crate::types::{MessageType, Role};
use crate::Error;

/// Where a [`CertificateVerifyFlow`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum State {
    #[default]
    Idle,
    /// Signed body built, not fully handed to the transport yet.
    AwaitingSend,
    AwaitingReceive,
    Done,
    /// A fatal error happened. Nothing more will be done.
    Aborted,
}

/// Outcome of a successful call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// The message was fully sent, or received and verified.
    Done,
    /// The message does not belong in this handshake. Nothing was sent or
    /// read.
    Skipped,
    /// The transport took part of the message. Call again with
    /// `again = true`.
    Pending,
}

/// One CertificateVerify message, sent or received.
#[derive(Debug, Default)]
pub struct CertificateVerifyFlow {
    state: State,
    /// Serialized body while sending.
    pending: Buf,
    /// How much of `pending` the transport has accepted.
    sent: usize,
}

impl CertificateVerifyFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Sign the transcript and send the CertificateVerify message.
    ///
    /// `again` continues a send that returned [`Progress::Pending`].
    pub fn send(
        &mut self,
        session: &mut Session,
        auth: &mut dyn CertificateAuth,
        io: &mut dyn HandshakeIo,
        again: bool,
    ) -> Result<Progress, Error> {
        let result = self.do_send(session, auth, io, again);
        self.finish(result)
    }

    /// Receive the peer's CertificateVerify message and verify it.
    pub fn recv(
        &mut self,
        session: &mut Session,
        auth: &mut dyn CertificateAuth,
        io: &mut dyn HandshakeIo,
    ) -> Result<Progress, Error> {
        let result = self.do_recv(session, auth, io);
        self.finish(result)
    }

    fn finish(&mut self, result: Result<Progress, Error>) -> Result<Progress, Error> {
        if let Err(e) = &result {
            debug!("CertificateVerify aborted in {:?}: {}", self.state, e);
            self.pending.clear();
            self.set_state(State::Aborted);
        }
        result
    }

    fn set_state(&mut self, state: State) {
        if self.state != state {
            trace!("{:?} -> {:?}", self.state, state);
            self.state = state;
        }
    }

    fn do_send(
        &mut self,
        session: &mut Session,
        auth: &mut dyn CertificateAuth,
        io: &mut dyn HandshakeIo,
        again: bool,
    ) -> Result<Progress, Error> {
        match (self.state, again) {
            (State::Idle, false) => {}
            (State::AwaitingSend, true) => return self.flush(session, io),
            (State::Idle, true) => {
                return Err(Error::InternalError(
                    "Resumed a CertificateVerify that was never started".to_string(),
                ))
            }
            (state, _) => {
                return Err(Error::InternalError(format!(
                    "CertificateVerify send in state {:?}",
                    state
                )))
            }
        }

        let role = session.role();
        let selected = auth.selected_certificate();

        if selected.certs.is_empty() {
            if role == Role::Server {
                return Err(Error::InsufficientCredentials);
            }
            if !session.has_flag(HandshakeFlag::CertificateSent) {
                debug!("No client certificate, skipping CertificateVerify");
                self.set_state(State::Done);
                return Ok(Progress::Skipped);
            }
            return Err(Error::InternalError(
                "Certificate sent without a selected credential".to_string(),
            ));
        }

        let Some(key) = selected.key else {
            return Err(Error::InternalError(
                "Selected certificate has no private key".to_string(),
            ));
        };

        let descriptor = registry::best_for(
            key.key_algorithm(),
            session.version(),
            session.config().signature_policy(),
            session.peer_signature_schemes(),
        )?;
        session.record_signature_scheme(role, descriptor.scheme);

        let mut digest = Buf::new();
        session.transcript().digest(&mut digest);

        let mut signature = Buf::new();
        signed::sign(role, &digest, key, descriptor, &mut signature)?;

        self.pending.clear();
        CertificateVerify::new(descriptor.scheme, &signature).serialize(&mut self.pending)?;
        self.sent = 0;

        session
            .transcript_mut()
            .add_handshake(MessageType::CertificateVerify, &self.pending)?;

        debug!(
            "Sending CertificateVerify: {} ({} bytes)",
            descriptor.name,
            self.pending.len()
        );
        self.set_state(State::AwaitingSend);

        self.flush(session, io)
    }

    fn flush(&mut self, session: &mut Session, io: &mut dyn HandshakeIo) -> Result<Progress, Error> {
        let remaining = &self.pending[self.sent..];
        let accepted = io.send_handshake(MessageType::CertificateVerify, remaining)?;

        if accepted > remaining.len() {
            return Err(Error::InternalError(format!(
                "Transport accepted {} bytes of {}",
                accepted,
                remaining.len()
            )));
        }

        self.sent += accepted;
        if self.sent < self.pending.len() {
            trace!(
                "CertificateVerify partially sent: {}/{}",
                self.sent,
                self.pending.len()
            );
            return Ok(Progress::Pending);
        }

        self.pending.clear();
        self.sent = 0;
        session.set_flag(HandshakeFlag::CertificateVerifySent);
        self.set_state(State::Done);
        Ok(Progress::Done)
    }

    fn do_recv(
        &mut self,
        session: &mut Session,
        auth: &mut dyn CertificateAuth,
        io: &mut dyn HandshakeIo,
    ) -> Result<Progress, Error> {
        if self.state != State::Idle {
            return Err(Error::InternalError(format!(
                "CertificateVerify receive in state {:?}",
                self.state
            )));
        }

        if !session.has_flag(HandshakeFlag::CertificateVerifyExpected) {
            trace!("CertificateVerify not expected");
            self.set_state(State::Done);
            return Ok(Progress::Skipped);
        }

        self.set_state(State::AwaitingReceive);

        let body = io.recv_handshake(MessageType::CertificateVerify)?;
        if body.len() < 2 {
            return Err(Error::UnexpectedPacketLength);
        }

        let wire_id = u16::from_be_bytes([body[0], body[1]]);

        let descriptor = registry::resolve(wire_id, session.version())?;
        session.record_signature_scheme(session.role().peer(), descriptor.scheme);

        let policy = session.config().signature_policy();
        if !policy.is_enabled(descriptor.scheme) {
            debug!("Peer used {} which is not enabled", descriptor.name);
            return Err(Error::UnsupportedSignatureAlgorithm(wire_id));
        }
        if descriptor.security < policy.min_security() {
            debug!(
                "Peer used {} below minimum security {:?}",
                descriptor.name,
                policy.min_security()
            );
            return Err(Error::UnsupportedSignatureAlgorithm(wire_id));
        }

        let (rest, message) = CertificateVerify::parse(&body)
            .map_err(|_| Error::ReceivedIllegalParameter("Truncated signature".to_string()))?;
        if message.signature.is_empty() {
            return Err(Error::ReceivedIllegalParameter(
                "Empty signature".to_string(),
            ));
        }

        let peer = auth.peer_credential(session.config().certificate_type())?;

        let mut digest = Buf::new();
        session.transcript().digest(&mut digest);

        let verifier = session.config().crypto_provider().signature_verification;
        signed::verify(
            verifier,
            session.role(),
            &digest,
            &peer,
            message.signature,
            descriptor,
            session.verify_flags(),
        )?;

        if !rest.is_empty() {
            debug!(
                "{} trailing bytes after CertificateVerify signature",
                rest.len()
            );
            return Err(Error::UnexpectedPacketLength);
        }

        session
            .transcript_mut()
            .add_handshake(MessageType::CertificateVerify, &body)?;
        session.set_flag(HandshakeFlag::CertificateVerifyReceived);

        debug!("Received CertificateVerify: {}", descriptor.name);
        self.set_state(State::Done);
        Ok(Progress::Done)
    }
}
