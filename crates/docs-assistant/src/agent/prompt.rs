//! System instruction for the answering agent

/// Build the system instruction for a documentation assistant about `product`
pub fn system_prompt(product: &str) -> String {
    format!(
        "You are a helpful AI assistant that answers questions about {product} documentation. \
         You have access to a tool that retrieves relevant documentation. \
         Use the tool to find relevant information before answering questions. \
         If the user asks for them, always cite the sources you use in your answers. \
         If you cannot find the answer in the retrieved documentation, say so."
    )
}
