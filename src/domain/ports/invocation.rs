//! PortletInvocation port
//!
//! The slice of a portlet call the session logic needs. How the call reaches
//! the producer is not known here.

pub trait PortletInvocation {
    /// Consumer-side session key, if the invocation runs inside a session
    fn session_key(&self) -> Option<&str>;

    fn portlet_handle(&self) -> &str;
}
