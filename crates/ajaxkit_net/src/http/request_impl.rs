pub mod reqwest_impl;

pub type RequestImpl = reqwest_impl::ReqwestAgent;
