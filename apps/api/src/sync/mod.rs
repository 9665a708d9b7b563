// Backend sync: best-effort forwarding of a finished generation to the automation webhook.

pub mod webhook;
